//! Normalize stage: copy downloaded sheets into a mirrored tree under canonical names.
//!
//! Sources are only read. Every copy overwrites its target, so running the
//! stage again over an unchanged source tree reproduces the same output.

mod rule;

pub use rule::{pad_number, CanonicalName, NameRule, NUMBER_WIDTH};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::PvsyncConfig;
use crate::report::NormalizeReport;

/// Extension (case-insensitive) of files considered for normalization.
pub const SOURCE_EXTENSION: &str = "pdf";

/// One successful copy, handed to the caller's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub new_name: String,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    source_root: PathBuf,
    dest_root: PathBuf,
    rule: NameRule,
}

impl Normalizer {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>, rule: NameRule) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            rule,
        }
    }

    pub fn from_config(cfg: &PvsyncConfig) -> Result<Self> {
        let rule = NameRule::new(&cfg.scan_marker)
            .with_context(|| format!("build filename pattern for marker {:?}", cfg.scan_marker))?;
        Ok(Self::new(&cfg.source_root, &cfg.dest_root, rule))
    }

    /// Walks the source tree and copies every matching sheet.
    ///
    /// Filesystem failures, including an uncreatable root, are logged and
    /// counted in `failed`; the walk continues past per-file failures.
    pub fn run<F>(&self, mut on_copied: F) -> NormalizeReport
    where
        F: FnMut(&CopiedFile),
    {
        let mut report = NormalizeReport::default();
        for (label, root) in [("source", &self.source_root), ("destination", &self.dest_root)] {
            if let Err(err) = fs::create_dir_all(root) {
                tracing::error!("create {} root {}: {}", label, root.display(), err);
                report.failed += 1;
            }
        }
        if report.failed > 0 {
            return report;
        }
        let dest_canonical = fs::canonicalize(&self.dest_root).ok();

        let mut written: HashSet<PathBuf> = HashSet::new();

        let walker = WalkDir::new(&self.source_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_dest_root(e, dest_canonical.as_deref()));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::error!("walk {}: {}", self.source_root.display(), err);
                    report.failed += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !has_source_extension(entry.path()) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(canonical) = self.rule.canonical_name(&file_name) else {
                tracing::debug!("skip {}: name does not match", entry.path().display());
                report.skipped += 1;
                continue;
            };

            match self.copy_one(entry.path(), &canonical) {
                Ok(copied) => {
                    if !written.insert(copied.destination.clone()) {
                        tracing::warn!(
                            "{} overwrote an earlier copy at {}",
                            copied.source.display(),
                            copied.destination.display()
                        );
                        report.collisions += 1;
                    }
                    tracing::debug!(
                        "copied {} -> {}",
                        copied.source.display(),
                        copied.destination.display()
                    );
                    report.copied += 1;
                    on_copied(&copied);
                }
                Err(err) => {
                    tracing::error!("{:#}", err);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(?report, "normalize finished");
        report
    }

    /// Destination for `source`: same relative directory under the destination root.
    pub fn destination_for(&self, source: &Path, canonical: &CanonicalName) -> PathBuf {
        let rel_dir = source
            .parent()
            .and_then(|p| p.strip_prefix(&self.source_root).ok())
            .unwrap_or_else(|| Path::new(""));
        self.dest_root.join(rel_dir).join(canonical.file_name())
    }

    fn copy_one(&self, source: &Path, canonical: &CanonicalName) -> Result<CopiedFile> {
        let destination = self.destination_for(source, canonical);
        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        fs::copy(source, &destination).with_context(|| {
            format!("copy {} -> {}", source.display(), destination.display())
        })?;
        Ok(CopiedFile {
            source: source.to_path_buf(),
            destination,
            new_name: canonical.file_name(),
        })
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// True for the destination root when it sits inside the source tree.
fn is_dest_root(entry: &walkdir::DirEntry, dest: Option<&Path>) -> bool {
    let Some(dest) = dest else {
        return false;
    };
    entry.file_type().is_dir()
        && entry.depth() > 0
        && fs::canonicalize(entry.path()).is_ok_and(|p| p == dest)
}
