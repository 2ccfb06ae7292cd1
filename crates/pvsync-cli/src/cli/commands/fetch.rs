//! `pvsync fetch` – download scanned sheets per subdivision.

use anyhow::Result;
use pvsync_core::config::PvsyncConfig;
use pvsync_core::fetch::{FetchEvent, FetchSettings, Fetcher};
use pvsync_core::http::{CurlClient, CurlOptions};
use pvsync_core::report::FetchReport;
use std::time::Duration;

pub async fn run_fetch(cfg: &PvsyncConfig) -> Result<FetchReport> {
    cfg.validate()?;
    let codes = cfg.subdivision_codes()?;
    if cfg.skip >= codes.len() {
        tracing::warn!(
            "skip {} leaves nothing to fetch ({} subdivision(s) configured)",
            cfg.skip,
            codes.len()
        );
    }

    let client = CurlClient::new(CurlOptions {
        user_agent: cfg.user_agent.clone(),
        timeout: cfg.request_timeout_secs.map(Duration::from_secs),
        ..CurlOptions::default()
    });

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<FetchEvent>();
    let progress_handle = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            print_event(&event);
        }
    });

    let fetcher = Fetcher::new(client, FetchSettings::from_config(cfg)).with_events(event_tx);
    let report = fetcher.run(&codes, cfg.skip).await;
    // Closing the sender lets the printer drain and finish.
    drop(fetcher);
    let _ = progress_handle.await;

    println!("{}", report);
    if report.storage_errors > 0 {
        tracing::error!("{} document(s) could not be written to disk", report.storage_errors);
    }
    Ok(report)
}

fn print_event(event: &FetchEvent) {
    match event {
        FetchEvent::SubdivisionStarted { code, documents } => {
            println!("[{}] {} scanned document(s)", code, documents);
        }
        FetchEvent::ManifestFailed { code, error } => {
            println!("[{}] manifest unavailable, skipping: {}", code, error);
        }
        FetchEvent::DirectoryFailed { code, path, error } => {
            println!("[{}] cannot create {}: {}", code, path.display(), error);
        }
        FetchEvent::Downloaded {
            destination,
            attempts,
        } => {
            if *attempts > 1 {
                println!("Downloaded: {} (attempt {})", destination.display(), attempts);
            } else {
                println!("Downloaded: {}", destination.display());
            }
        }
        FetchEvent::DownloadFailed {
            url,
            attempts,
            error,
        } => {
            println!(
                "Failed to download {} after {} attempt(s): {}",
                url, attempts, error
            );
        }
    }
}
