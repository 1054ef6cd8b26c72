use std::result::Result as StdResult;

use thiserror::Error;

use crate::NodeId;

/// Convenient result type for page operations.
pub type Result<T> = StdResult<T, DomError>;

/// Errors raised by page queries and mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// Selector text as supplied.
        selector: String,
        /// What the parser rejected.
        reason: String,
    },

    /// The XPath expression could not be parsed.
    #[error("Invalid XPath '{expr}': {reason}")]
    InvalidXPath {
        /// Expression text as supplied.
        expr: String,
        /// What the parser rejected.
        reason: String,
    },

    /// The node id does not refer to an element attached to this page.
    #[error("Unknown or detached node {0:?}")]
    UnknownNode(NodeId),
}
