//! Writing downloaded documents to disk.
//!
//! Bodies are written to `<name>.part` and renamed over the final path, so an
//! existing file is replaced whole and an interrupted write never leaves a
//! truncated document under the real name.

use std::path::{Path, PathBuf};

/// Temporary file suffix used before the rename.
pub const TEMP_SUFFIX: &str = ".part";

/// `file.pdf` → `file.pdf.part`.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `bytes` to `final_path`, overwriting any existing file.
pub async fn write_atomic(final_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = temp_path(final_path);
    let written = match tokio::fs::write(&tmp, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, final_path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
