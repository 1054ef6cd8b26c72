//! elements: Strategies for identifying page elements across reloads.
//!
//! An [`ElementHandler`] knows one family of interactive elements. It decides
//! whether it claims an element, snapshots it into a [`SelectorDescriptor`],
//! finds the same logical element again from that descriptor on a fresh page,
//! and activates it. The [`HandlerRegistry`] holds handlers in priority order
//! and dispatches on [`ElementType`].
#![warn(missing_docs)]

mod button;
mod descriptor;
mod handler;
mod registry;

pub use button::ButtonHandler;
pub use descriptor::{ElementType, SelectorDescriptor};
pub use handler::ElementHandler;
pub use registry::{HandlerRegistry, RegistryError};
