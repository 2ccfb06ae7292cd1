//! Per-attempt fetch error, classified before deciding on a retry.

/// Error from a single GET attempt or from storing its body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Disk/storage write failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The blocking request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Join(String),
}

impl FetchError {
    pub fn is_storage(&self) -> bool {
        matches!(self, FetchError::Storage(_))
    }
}
