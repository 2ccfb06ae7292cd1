//! URL building and local filename derivation for portal documents.

mod path;
mod sanitize;

pub use path::{filename_from_url, percent_decode};
pub use sanitize::sanitize_filename;

use url::Url;

use crate::subdivision::SubdivisionCode;

/// Joins a portal-relative path onto `base`.
///
/// Already-absolute URLs are returned as-is. Otherwise exactly one `/`
/// separates base and path, so `/data/x.pdf` and `data/x.pdf` both land under
/// the base path rather than replacing it.
pub fn resolve(base: &str, relative: &str) -> Result<Url, url::ParseError> {
    if let Ok(absolute) = Url::parse(relative) {
        if absolute.has_host() {
            return Ok(absolute);
        }
    }
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    );
    Url::parse(&joined)
}

/// Manifest URL for one subdivision: `template` with `{code}` substituted, resolved against `base`.
pub fn manifest_url(
    base: &str,
    template: &str,
    code: &SubdivisionCode,
) -> Result<Url, url::ParseError> {
    resolve(base, &template.replace("{code}", code.as_str()))
}
