//! Subdivision manifests: the JSON documents listing one subdivision's files.
//!
//! The portal nests result sheets as `scopes → … → files → [{ url }]` with a
//! varying number of levels in between, so extraction searches by key name
//! at any depth instead of relying on a fixed schema.

mod search;

pub use search::{collect_by_key_path, descendants_by_key};

use serde_json::Value;

/// Key path leading from the manifest root to document URLs.
pub const URL_KEY_PATH: [&str; 3] = ["scopes", "files", "url"];

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every string found at [`URL_KEY_PATH`] in an already-parsed manifest.
pub fn extract_urls(root: &Value) -> Vec<String> {
    collect_by_key_path(root, &URL_KEY_PATH)
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Parses a manifest body and returns every document URL it lists.
pub fn parse_manifest(body: &[u8]) -> Result<Vec<String>, ManifestError> {
    let root: Value = serde_json::from_slice(body)?;
    if root.get("scopes").is_none() {
        tracing::warn!("manifest has no top-level `scopes` key");
    }
    Ok(extract_urls(&root))
}

/// Keeps only URLs that reference scanned sheets.
pub fn scanned_only(urls: Vec<String>, marker: &str) -> Vec<String> {
    urls.into_iter().filter(|u| u.contains(marker)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn url_set(v: &Value) -> BTreeSet<String> {
        extract_urls(v).into_iter().collect()
    }

    fn expected(urls: &[&str]) -> BTreeSet<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn urls_at_depth_one() {
        let v = json!({
            "scopes": {
                "files": [ { "url": "/a_scnnd.pdf" }, { "url": "/b.pdf" } ]
            }
        });
        assert_eq!(url_set(&v), expected(&["/a_scnnd.pdf", "/b.pdf"]));
    }

    #[test]
    fn urls_at_depth_two() {
        let v = json!({
            "scopes": {
                "PRCNCT": {
                    "1": { "files": [ { "url": "/p1.pdf", "name": "x" } ] },
                    "2": { "files": [ { "url": "/p2.pdf" } ] }
                }
            }
        });
        assert_eq!(url_set(&v), expected(&["/p1.pdf", "/p2.pdf"]));
    }

    #[test]
    fn urls_at_depth_three_and_mixed() {
        let v = json!({
            "scopes": [
                { "files": [ { "url": "/shallow.pdf" } ] },
                { "CNTY": { "cj": [ { "PRCNCT": { "files": [ { "url": "/deep1.pdf" }, { "url": "/deep2.pdf" } ] } } ] } }
            ]
        });
        assert_eq!(
            url_set(&v),
            expected(&["/shallow.pdf", "/deep1.pdf", "/deep2.pdf"])
        );
    }

    #[test]
    fn non_string_urls_ignored() {
        let v = json!({ "scopes": { "files": [ { "url": 7 }, { "url": null }, { "url": "/ok.pdf" } ] } });
        assert_eq!(extract_urls(&v), vec!["/ok.pdf".to_string()]);
    }

    #[test]
    fn parse_manifest_without_scopes_is_empty() {
        let urls = parse_manifest(br#"{"files":[{"url":"/x.pdf"}]}"#).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn parse_manifest_rejects_invalid_json() {
        assert!(matches!(
            parse_manifest(b"<html>not json</html>"),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn scanned_filter_keeps_marker_only() {
        let urls = vec![
            "/data/pv/cj/pv_cj_1_1_scnnd_a.pdf".to_string(),
            "/data/pv/cj/pv_cj_1_1_typed.pdf".to_string(),
            "/data/pv/cj/pv_cj_1_2_scnnd_b.pdf".to_string(),
        ];
        let kept = scanned_only(urls, "scnnd");
        assert_eq!(
            kept,
            vec![
                "/data/pv/cj/pv_cj_1_1_scnnd_a.pdf".to_string(),
                "/data/pv/cj/pv_cj_1_2_scnnd_b.pdf".to_string(),
            ]
        );
    }
}
