//! Content script for WebKeyBind.
//!
//! One [`ContentScript`] lives in each page context. It owns the handler
//! registry, the element picker, the matcher and the page's active set, and is
//! driven by the host's event loop: key, pointer and click events plus
//! messages from the background service.
#![warn(missing_docs)]

mod error;
mod notify;
mod script;

pub use error::{Error, Result};
pub use notify::NotificationDispatcher;
pub use script::ContentScript;
