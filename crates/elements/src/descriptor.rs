use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Families of interactive elements a handler can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Buttons and button-like elements.
    Button,
    /// Form inputs.
    Input,
    /// Anchors.
    Link,
    /// Anything else a custom handler claims.
    Custom,
}

impl ElementType {
    /// Wire name of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Input => "input",
            Self::Link => "link",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an element taken at selection time.
///
/// This is a best-effort fingerprint, not a unique key: resolution tries the
/// CSS path, then the XPath, then disambiguates with `index` and
/// `text_content`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorDescriptor {
    /// Ancestor-climbed CSS selector.
    #[serde(alias = "selector")]
    pub css_path: String,
    /// Absolute XPath, or an id lookup.
    pub xpath: String,
    /// Trimmed text content of the element.
    #[serde(default)]
    pub text_content: String,
    /// Position of the element among the matches of `css_path`.
    #[serde(default, deserialize_with = "index_or_none")]
    pub index: Option<usize>,
}

/// Accept `null`, a position, or the `-1` that records "not among the matches".
fn index_or_none<'de, D>(de: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(de)?;
    Ok(raw.and_then(|i| usize::try_from(i).ok()))
}
