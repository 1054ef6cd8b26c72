use std::result::Result as StdResult;

use bindings::StoreError;
use thiserror::Error;

/// Errors surfaced by `wkb`.
#[derive(Debug, Error)]
pub enum Error {
    /// The binding store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Listing could not be encoded as JSON.
    #[error("Failed to encode bindings: {0}")]
    Encode(#[from] serde_json::Error),

    /// The URL given to `match` does not parse.
    #[error("Invalid URL '{url}': {message}")]
    Url {
        /// Input.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;
