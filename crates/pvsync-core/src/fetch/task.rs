//! Turning manifest URLs into download tasks.

use std::path::{Path, PathBuf};

use url::Url;

use crate::subdivision::SubdivisionCode;
use crate::url_model;

/// One document to download: where from, where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub code: SubdivisionCode,
    pub url: Url,
    pub destination: PathBuf,
}

/// Builds tasks for `urls` under `dir`. URLs that do not resolve or have no
/// usable filename are returned separately.
pub fn plan_tasks(
    base_url: &str,
    code: &SubdivisionCode,
    dir: &Path,
    urls: &[String],
) -> (Vec<DownloadTask>, Vec<String>) {
    let mut tasks = Vec::with_capacity(urls.len());
    let mut rejected = Vec::new();
    for raw in urls {
        let url = match url_model::resolve(base_url, raw) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(code = %code, "cannot resolve {}: {}", raw, e);
                rejected.push(raw.clone());
                continue;
            }
        };
        let Some(name) = url_model::filename_from_url(&url) else {
            tracing::warn!(code = %code, "no filename in {}", url);
            rejected.push(raw.clone());
            continue;
        };
        tasks.push(DownloadTask {
            code: code.clone(),
            url,
            destination: dir.join(name),
        });
    }
    (tasks, rejected)
}
