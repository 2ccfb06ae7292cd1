//! Filename extraction from a URL path.

use url::Url;

use super::sanitize::sanitize_filename;

/// Last path segment of `url`, percent-decoded and sanitized.
///
/// Returns `None` when the path is empty or ends in `/`, `.` or `..`.
pub fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    let decoded = percent_decode(segment);
    let name = sanitize_filename(&decoded);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}

/// Decodes `%XX` escapes; malformed escapes are kept verbatim.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
