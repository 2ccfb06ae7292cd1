//! End-of-stage counters printed as the run summary.

use std::fmt;

/// Counters for one subdivision; summed into [`FetchReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdivisionReport {
    /// Manifest fetched and parsed.
    pub manifest_ok: bool,
    /// URLs found in the manifest.
    pub listed: usize,
    /// URLs dropped because they lack the scan marker.
    pub filtered: usize,
    /// URLs that could not be turned into a download task.
    pub invalid: usize,
    pub downloaded: usize,
    /// Documents whose retries were exhausted.
    pub failed: usize,
    /// Directory creation or file write failures.
    pub storage_errors: usize,
    /// HTTP requests issued, manifest included.
    pub requests: u32,
    /// Throttle pauses taken (one per successful download).
    pub throttled: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub subdivisions_ok: usize,
    pub subdivisions_failed: usize,
    pub listed: usize,
    pub filtered: usize,
    pub invalid: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub storage_errors: usize,
    pub requests: u32,
    pub throttled: usize,
}

impl FetchReport {
    pub fn absorb(&mut self, sub: &SubdivisionReport) {
        if sub.manifest_ok {
            self.subdivisions_ok += 1;
        } else {
            self.subdivisions_failed += 1;
        }
        self.listed += sub.listed;
        self.filtered += sub.filtered;
        self.invalid += sub.invalid;
        self.downloaded += sub.downloaded;
        self.failed += sub.failed;
        self.storage_errors += sub.storage_errors;
        self.requests += sub.requests;
        self.throttled += sub.throttled;
    }
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetch: {} subdivision(s) ok, {} failed; {} downloaded, {} failed, {} skipped (not scanned), {} invalid; {} storage error(s)",
            self.subdivisions_ok,
            self.subdivisions_failed,
            self.downloaded,
            self.failed,
            self.filtered,
            self.invalid,
            self.storage_errors
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub copied: usize,
    /// Files whose name did not match the pattern.
    pub skipped: usize,
    /// Directory creation or copy failures.
    pub failed: usize,
    /// Copies that replaced a file written earlier in the same run.
    pub collisions: usize,
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "normalize: {} copied, {} skipped, {} failed, {} collision(s)",
            self.copied, self.skipped, self.failed, self.collisions
        )
    }
}
