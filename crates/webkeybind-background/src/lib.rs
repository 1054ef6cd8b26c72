//! Background service for WebKeyBind.
//!
//! The background context is the only writer of the persisted binding
//! collection. It answers `saveBinding`, `deleteBinding`, `getBindings` and
//! `elementSelected`, parks picked elements in scratch storage for a
//! management surface to collect, and after every successful write tells every
//! tab to reload its active set.
#![warn(missing_docs)]

mod error;
mod service;

pub use error::{Error, Result};
pub use service::{BackgroundService, InstallReason};
