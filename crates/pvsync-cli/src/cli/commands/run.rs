//! `pvsync run` – fetch, then normalize.

use anyhow::Result;
use pvsync_core::config::PvsyncConfig;

use super::{run_fetch, run_normalize};

/// How the process should exit after a command that touched the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    /// Some files could not be written; the run still went through every item.
    FilesystemErrors,
}

impl RunStatus {
    pub fn from_counts(fetch_storage_errors: usize, normalize_failures: usize) -> Self {
        if fetch_storage_errors > 0 || normalize_failures > 0 {
            RunStatus::FilesystemErrors
        } else {
            RunStatus::Clean
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::FilesystemErrors => 2,
        }
    }
}

pub async fn run_pipeline(cfg: &PvsyncConfig) -> Result<RunStatus> {
    let fetched = run_fetch(cfg).await?;
    let normalized = run_normalize(cfg).await?;
    Ok(RunStatus::from_counts(
        fetched.storage_errors,
        normalized.failed,
    ))
}
