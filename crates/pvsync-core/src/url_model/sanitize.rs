//! Filesystem-safe filenames.

const NAME_MAX: usize = 255;

/// Makes a filename safe to create on Linux and Windows.
///
/// Path separators, NUL, control characters and the Windows-reserved
/// `<>:"|?*` become `_`; leading/trailing spaces and dots are trimmed; the
/// result is capped at 255 bytes on a char boundary. Underscores are kept
/// as-is since the normalizer reads fields between them.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
