//! Fetch stage: manifests → scanned-document URLs → files on disk.
//!
//! Subdivisions and documents are processed strictly one after another. A
//! failure only ever costs the item it happened to; the run always reaches
//! the last subdivision.

mod task;

pub use task::{plan_tasks, DownloadTask};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::PvsyncConfig;
use crate::http::HttpGet;
use crate::manifest;
use crate::report::{FetchReport, SubdivisionReport};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::storage;
use crate::subdivision::SubdivisionCode;
use crate::url_model;

/// Everything the fetcher needs from configuration.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub manifest_path: String,
    pub scan_marker: String,
    pub source_root: PathBuf,
    pub policy: RetryPolicy,
    pub throttle: Duration,
}

impl FetchSettings {
    pub fn from_config(cfg: &PvsyncConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            manifest_path: cfg.manifest_path.clone(),
            scan_marker: cfg.scan_marker.clone(),
            source_root: cfg.source_root.clone(),
            policy: cfg.retry_policy(),
            throttle: cfg.throttle(),
        }
    }
}

/// Progress notifications for whoever drives the fetcher (the CLI prints them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    SubdivisionStarted {
        code: SubdivisionCode,
        documents: usize,
    },
    ManifestFailed {
        code: SubdivisionCode,
        error: String,
    },
    /// The subdivision's directory could not be created; nothing was requested.
    DirectoryFailed {
        code: SubdivisionCode,
        path: PathBuf,
        error: String,
    },
    Downloaded {
        destination: PathBuf,
        attempts: u32,
    },
    DownloadFailed {
        url: String,
        attempts: u32,
        error: String,
    },
}

/// Result of downloading one document.
#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded { attempts: u32, bytes: usize },
    Failed { attempts: u32, error: FetchError },
}

impl DownloadOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DownloadOutcome::Downloaded { attempts, .. }
            | DownloadOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}

pub struct Fetcher<C: HttpGet> {
    client: Arc<C>,
    settings: FetchSettings,
    events: Option<UnboundedSender<FetchEvent>>,
}

impl<C: HttpGet> Fetcher<C> {
    pub fn new(client: C, settings: FetchSettings) -> Self {
        Self {
            client: Arc::new(client),
            settings,
            events: None,
        }
    }

    /// Send progress events to `tx` as the run advances.
    pub fn with_events(mut self, tx: UnboundedSender<FetchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: FetchEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Fetches every subdivision in `codes` after the first `skip`.
    pub async fn run(&self, codes: &[SubdivisionCode], skip: usize) -> FetchReport {
        let mut report = FetchReport::default();
        if skip > 0 {
            tracing::info!("skipping first {} of {} subdivision(s)", skip, codes.len());
        }
        for code in codes.iter().skip(skip) {
            let sub = self.fetch_subdivision(code).await;
            report.absorb(&sub);
        }
        tracing::info!(?report, "fetch finished");
        report
    }

    /// Manifest, filter, and download for one subdivision.
    pub async fn fetch_subdivision(&self, code: &SubdivisionCode) -> SubdivisionReport {
        let mut report = SubdivisionReport::default();
        let dir = self.settings.source_root.join(code.as_str());
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::error!(code = %code, "create {}: {}", dir.display(), e);
            report.storage_errors += 1;
            self.emit(FetchEvent::DirectoryFailed {
                code: code.clone(),
                path: dir.clone(),
                error: e.to_string(),
            });
            return report;
        }

        let urls = match self.fetch_manifest(code, &mut report).await {
            Ok(urls) => urls,
            Err(error) => {
                tracing::error!(code = %code, "manifest unavailable: {}", error);
                self.emit(FetchEvent::ManifestFailed {
                    code: code.clone(),
                    error,
                });
                return report;
            }
        };
        report.manifest_ok = true;
        report.listed = urls.len();

        let scanned = manifest::scanned_only(urls, &self.settings.scan_marker);
        report.filtered = report.listed - scanned.len();

        let (tasks, rejected) = plan_tasks(&self.settings.base_url, code, &dir, &scanned);
        report.invalid = rejected.len();

        tracing::info!(
            code = %code,
            listed = report.listed,
            scanned = tasks.len(),
            "fetching subdivision"
        );
        self.emit(FetchEvent::SubdivisionStarted {
            code: code.clone(),
            documents: tasks.len(),
        });

        for task in &tasks {
            let outcome = self.download(task).await;
            report.requests += outcome.attempts();
            match outcome {
                DownloadOutcome::Downloaded { attempts, bytes } => {
                    report.downloaded += 1;
                    tracing::debug!(bytes, "saved {}", task.destination.display());
                    self.emit(FetchEvent::Downloaded {
                        destination: task.destination.clone(),
                        attempts,
                    });
                    if !self.settings.throttle.is_zero() {
                        tokio::time::sleep(self.settings.throttle).await;
                    }
                    report.throttled += 1;
                }
                DownloadOutcome::Failed { attempts, error } => {
                    if error.is_storage() {
                        tracing::error!("write {}: {}", task.destination.display(), error);
                        report.storage_errors += 1;
                    } else {
                        tracing::warn!(
                            "failed to download {} after {} attempt(s): {}",
                            task.url,
                            attempts,
                            error
                        );
                    }
                    report.failed += 1;
                    self.emit(FetchEvent::DownloadFailed {
                        url: task.url.to_string(),
                        attempts,
                        error: error.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Downloads one document with retries, writing it over any existing file.
    pub async fn download(&self, task: &DownloadTask) -> DownloadOutcome {
        let max = self.settings.policy.max_attempts;
        let outcome = run_with_retry(&self.settings.policy, move |attempt| async move {
            tracing::debug!("downloading {} (attempt {}/{})", task.url, attempt, max);
            let body = self.get(task.url.as_str()).await?;
            storage::write_atomic(&task.destination, &body).await?;
            Ok(body.len())
        })
        .await;
        match outcome.result {
            Ok(bytes) => DownloadOutcome::Downloaded {
                attempts: outcome.attempts,
                bytes,
            },
            Err(error) => DownloadOutcome::Failed {
                attempts: outcome.attempts,
                error,
            },
        }
    }

    async fn fetch_manifest(
        &self,
        code: &SubdivisionCode,
        report: &mut SubdivisionReport,
    ) -> Result<Vec<String>, String> {
        let url =
            url_model::manifest_url(&self.settings.base_url, &self.settings.manifest_path, code)
                .map_err(|e| format!("manifest URL: {}", e))?;
        let target = url.as_str();
        let outcome = run_with_retry(&self.settings.policy, move |_| self.get(target)).await;
        let attempts = outcome.attempts;
        report.requests += attempts;
        let body = outcome
            .result
            .map_err(|e| format!("GET {} failed after {} attempt(s): {}", url, attempts, e))?;
        manifest::parse_manifest(&body).map_err(|e| format!("{}: {}", url, e))
    }

    /// Runs the blocking client on tokio's blocking pool.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let client = Arc::clone(&self.client);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || client.get(&url))
            .await
            .map_err(|e| FetchError::Join(e.to_string()))?
    }
}
