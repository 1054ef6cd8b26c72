//! keychord: Keyboard chords as captured from page key events.
//!
//! - `KeyEvent`: Snapshot of a DOM `keydown` (key name plus modifier flags).
//! - `Modifier`: The four modifiers a page can observe, in canonical order.
//! - `Chord`: A modifier set plus one non-modifier key, built from an event
//!   or parsed from a spec such as `"Ctrl+Shift+K"`.
//! - `normalize`: Order-independent comparison form for chord strings.
//!
//! Stored bindings keep the chord string exactly as it was captured; both the
//! stored string and the live chord go through `normalize` at match time.

mod event;
pub use event::KeyEvent;

mod modifiers;
pub use modifiers::Modifier;

mod chord;
pub use chord::{Chord, normalize};
