use std::result::Result as StdResult;

use bindings::{DraftError, StoreError};
use elements::ElementType;
use pagedom::DomError;
use thiserror::Error;
use webkeybind_protocol::ChannelError;

/// Errors raised in a page context.
#[derive(Debug, Error)]
pub enum Error {
    /// No element on the page matches the binding's descriptor.
    #[error("Element not found")]
    ElementUnresolvable {
        /// Handler family of the binding.
        element_type: ElementType,
        /// Descriptor CSS path, for diagnostics.
        css_path: String,
    },

    /// No registered handler for the binding's element type.
    #[error("No handler for element type '{0}'")]
    NoHandler(ElementType),

    /// Activating the element failed.
    #[error("Trigger failed: {0}")]
    Trigger(#[from] DomError),

    /// Reading bindings failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The background service could not be reached.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The draft is incomplete.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Saving requires a picked element.
    #[error("No element selected")]
    NoSelection,

    /// The background service answered with a failure.
    #[error("{0}")]
    Rejected(String),

    /// The host stopped listening for notices.
    #[error("Notification channel closed")]
    ChannelClosed,
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;
