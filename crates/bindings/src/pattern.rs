use std::fmt;

use regex::Regex;

/// A URL wildcard pattern: `*` matches any run of characters, everything else
/// is literal, and the whole URL must match.
#[derive(Clone, Debug)]
pub struct UrlPattern {
    /// Pattern as written.
    raw: String,
    /// Compiled, anchored form.
    regex: Regex,
}

impl UrlPattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        Ok(Self {
            raw: pattern.to_string(),
            regex: Regex::new(&format!("^{body}$"))?,
        })
    }

    /// True when `url` matches the whole pattern.
    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
