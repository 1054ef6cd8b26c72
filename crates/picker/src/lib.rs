//! picker: Selection mode for binding a shortcut to a page element.
//!
//! [`ElementPicker`] is a two-state machine (`Idle`, `Active`). While active
//! it owns pointer-move, click and keydown in the capture phase: moves
//! highlight the nearest claimable element, a click on a claimed element
//! produces a [`Selection`] and returns to idle, and `Escape` cancels.
#![warn(missing_docs)]

mod picker;

pub use picker::{ClickOutcome, ElementPicker, OnSelect, PickerState, Selection};
