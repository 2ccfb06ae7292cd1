//! Territorial subdivision codes (counties, Bucharest sectors, diaspora).

use std::fmt;

/// The portal's subdivision codes, in the order a full run visits them.
pub const DEFAULT_CODES: [&str; 48] = [
    "ab", "ar", "ag", "bc", "bh", "bn", "br", "bt", "bv", "bz", //
    "cs", "cl", "cj", "ct", "cv", "db", "dj", "gl", "gr", "gj", //
    "hr", "hd", "il", "is", "if", "mm", "mh", "ms", "nt", "ot", //
    "ph", "sj", "sm", "sb", "sv", "tr", "tm", "tl", "vs", "vl", //
    "vn", "s1", "s2", "s3", "s4", "s5", "s6", "sr",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid subdivision code {0:?}: expected two ASCII letters or digits")]
pub struct SubdivisionError(pub String);

/// Two-character subdivision code, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubdivisionCode(String);

impl SubdivisionCode {
    pub fn parse(raw: &str) -> Result<Self, SubdivisionError> {
        let trimmed = raw.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(SubdivisionError(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubdivisionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SubdivisionCode {
    type Err = SubdivisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses a comma-separated list such as `ab,cj,s1`.
pub fn parse_list(raw: &str) -> Result<Vec<SubdivisionCode>, SubdivisionError> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(SubdivisionCode::parse)
        .collect()
}
