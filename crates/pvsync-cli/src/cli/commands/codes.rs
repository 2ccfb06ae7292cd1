//! `pvsync codes` – list subdivisions with the index `--skip` counts against.

use anyhow::Result;
use pvsync_core::config::PvsyncConfig;

pub fn run_codes(cfg: &PvsyncConfig) -> Result<()> {
    let codes = cfg.subdivision_codes()?;
    for (i, code) in codes.iter().enumerate() {
        let marker = if i < cfg.skip { " (skipped)" } else { "" };
        println!("{:>3}  {}{}", i, code, marker);
    }
    Ok(())
}
