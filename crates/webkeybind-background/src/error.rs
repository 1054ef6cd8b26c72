use std::result::Result as StdResult;

use bindings::StoreError;
use thiserror::Error;

/// Errors raised by the background service.
#[derive(Debug, Error)]
pub enum Error {
    /// Persisted or scratch storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The parked selection does not decode.
    #[error("Malformed pending selection: {0}")]
    Selection(String),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;
