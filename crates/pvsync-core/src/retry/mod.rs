//! Retry and backoff policy.
//!
//! Error classification and backoff decisions live here so the fetcher only
//! deals in outcomes: a result plus the number of attempts it took.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryOutcome};
