//! bindings: Everything about shortcuts that does not touch the live page.
//!
//! - [`KeyBinding`] is the persisted unit; [`BindingDraft`] is what a user fills
//!   in before a binding exists.
//! - [`BindingRepository`] reads and writes the collection through a
//!   [`KeyValueStore`]; the collection in the store is the only source of truth.
//! - [`ActiveSet`] is the disposable per-page subset, and [`BindingMatcher`]
//!   scans it for a pressed chord under the focus guard.
#![warn(missing_docs)]

mod active;
mod binding;
mod draft;
mod focus;
mod location;
mod matcher;
mod pattern;
mod repository;
mod store;

pub use active::ActiveSet;
pub use binding::{KeyBinding, generate_id, now_millis};
pub use draft::{BindingDraft, DraftError};
pub use focus::{FocusContext, is_text_entry};
pub use location::PageLocation;
pub use matcher::BindingMatcher;
pub use pattern::UrlPattern;
pub use repository::{BINDINGS_KEY, BindingRepository};
pub use store::{
    KeyValueStore, MemoryStore, StorageChange, StoreError, check_quota, item_size,
};
