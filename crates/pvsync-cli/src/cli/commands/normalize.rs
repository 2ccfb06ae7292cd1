//! `pvsync normalize` – copy sheets into the archive under canonical names.

use anyhow::{Context, Result};
use pvsync_core::config::PvsyncConfig;
use pvsync_core::normalize::Normalizer;
use pvsync_core::report::NormalizeReport;

pub async fn run_normalize(cfg: &PvsyncConfig) -> Result<NormalizeReport> {
    let normalizer = Normalizer::from_config(cfg)?;
    let report = tokio::task::spawn_blocking(move || {
        normalizer.run(|copied| println!("{}", copied.new_name))
    })
    .await
    .context("normalize task panicked")?;

    println!("{}", report);
    Ok(report)
}
