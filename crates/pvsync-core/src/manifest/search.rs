//! Recursive key search over a generic JSON tree.

use serde_json::Value;

/// Collects every value stored under `key` anywhere below `value`.
///
/// A matched value is not searched again for the same key, so a `files`
/// array nested inside another `files` array is reported once, through its
/// outermost match.
pub fn descendants_by_key<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(v);
                } else {
                    descendants_by_key(v, key, out);
                }
            }
        }
        Value::Array(items) => {
            for v in items {
                descendants_by_key(v, key, out);
            }
        }
        _ => {}
    }
}

/// Follows `path` one key at a time, each step matching at any depth below the
/// previous step's matches. Returns the values found for the last key.
pub fn collect_by_key_path<'a>(root: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut current = vec![root];
    for key in path {
        let mut next = Vec::new();
        for v in current {
            descendants_by_key(v, key, &mut next);
        }
        current = next;
    }
    current
}
