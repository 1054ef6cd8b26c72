//! pagedom: The live page as seen by the element-identity core.
//!
//! Everything that selects, describes, resolves or activates page elements is
//! written against two traits instead of a browser binding:
//!
//! - [`Document`]: read access to the element tree plus selector and XPath
//!   queries. Uniqueness checks during selector synthesis are single
//!   `query_selector_all` calls against this trait.
//! - [`Page`]: the handful of mutations the core performs (native click,
//!   inline style for highlighting, cursor affordance, the hint overlay and
//!   capture-listener registration).
//!
//! [`MemoryDom`] implements both over an arena tree. Selector queries go
//! through [`css`], which hands the rendered tree to `scraper`; XPath goes
//! through [`xpath`]. Both work over any `Document` and can be reused by hosts
//! that expose element accessors but lack a query engine.
#![warn(missing_docs)]

pub mod css;
mod document;
mod error;
mod memory;
pub mod xpath;

pub use document::{Disposition, Document, ListenerKind, NodeId, Page, PointerEvent};
pub use error::{DomError, Result};
pub use memory::{Element, MemoryDom};
