//! `pvsync config` – show where the config lives and what is in effect.

use anyhow::Result;
use pvsync_core::config::{self, PvsyncConfig};
use std::path::Path;

pub fn show_config(explicit: Option<&Path>, cfg: &PvsyncConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", cfg.to_toml_string()?);
    Ok(())
}
