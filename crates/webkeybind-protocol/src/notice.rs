use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    /// Neutral information.
    Info,
    /// Something worked.
    Success,
    /// Recoverable problem.
    #[serde(rename = "warning")]
    Warn,
    /// Failure.
    Error,
}

/// A message for the user, rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub kind: NotifyKind,
    /// Text to show.
    pub text: String,
}

impl Notice {
    /// Construct a notice.
    pub fn new(kind: NotifyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// An info notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotifyKind::Info, text)
    }

    /// A success notice.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotifyKind::Success, text)
    }

    /// A warning notice.
    pub fn warn(text: impl Into<String>) -> Self {
        Self::new(NotifyKind::Warn, text)
    }

    /// An error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotifyKind::Error, text)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.text)
    }
}
