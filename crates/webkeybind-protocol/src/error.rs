use thiserror::Error;

use crate::TabId;

/// Errors decoding a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The `action` is missing or not one this receiver handles.
    #[error("Unknown action")]
    UnknownAction(Option<String>),

    /// A known action whose payload does not decode.
    #[error("Malformed request: {message}")]
    Malformed {
        /// Wire name of the action.
        action: String,
        /// Decoder message.
        message: String,
    },
}

/// Errors moving messages between contexts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The receiving context is gone.
    #[error("Receiving end is closed")]
    Closed,

    /// The receiver dropped the request without answering.
    #[error("Request was dropped without a response")]
    NoResponse,

    /// The tab has no listening content script.
    #[error("Tab {0} is unreachable")]
    Unreachable(TabId),

    /// Any other transport failure.
    #[error("Transport failure: {0}")]
    Transport(String),
}
