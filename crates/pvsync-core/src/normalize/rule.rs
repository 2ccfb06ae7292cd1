//! Filename pattern: which downloaded sheets are kept and what they are renamed to.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::DEFAULT_SCAN_MARKER;

/// Width the sheet number is zero-padded to.
pub const NUMBER_WIDTH: usize = 4;

static DEFAULT_RULE: LazyLock<NameRule> = LazyLock::new(|| match NameRule::new(DEFAULT_SCAN_MARKER) {
    Ok(rule) => rule,
    Err(err) => panic!("invalid default filename pattern: {err}"),
});

/// Fields pulled out of a matching filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName {
    /// Two-character subdivision code, case as found.
    pub code: String,
    /// Sheet number after padding.
    pub number: String,
}

impl CanonicalName {
    /// `{code}_{number}.pdf`
    pub fn file_name(&self) -> String {
        format!("{}_{}.pdf", self.code, self.number)
    }
}

/// Matches `…_{code}_{digits}_{number}_{marker}…`, code case-insensitive.
///
/// The code may also open the name (`cj_05_0007_scnnd.pdf`).
#[derive(Debug, Clone)]
pub struct NameRule {
    re: Regex,
}

impl NameRule {
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?i)(?:^|_)([a-z0-9]{{2}})_[0-9]+_([0-9]+)_{}",
            regex::escape(marker)
        );
        Ok(Self {
            re: Regex::new(&pattern)?,
        })
    }

    pub fn canonical_name(&self, file_name: &str) -> Option<CanonicalName> {
        let caps = self.re.captures(file_name)?;
        Some(CanonicalName {
            code: caps.get(1)?.as_str().to_string(),
            number: pad_number(caps.get(2)?.as_str(), NUMBER_WIDTH),
        })
    }
}

impl Default for NameRule {
    fn default() -> Self {
        DEFAULT_RULE.clone()
    }
}

/// Left-pads `digits` with zeros to at least `width`; longer input is kept whole.
pub fn pad_number(digits: &str, width: usize) -> String {
    format!("{:0>width$}", digits, width = width)
}
