use serde::{Deserialize, Serialize};

/// Key name reported for the Escape key.
pub const ESCAPE: &str = "Escape";

/// A keyboard event as delivered by the page.
///
/// `key` is the DOM `KeyboardEvent.key` value: a single visible character
/// (`"k"`, `"K"`, `"/"`) or a named key (`"Escape"`, `"Enter"`, `"Control"`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// The `key` value of the event.
    pub key: String,
    /// Control held.
    #[serde(default)]
    pub ctrl_key: bool,
    /// Alt (Option) held.
    #[serde(default)]
    pub alt_key: bool,
    /// Shift held.
    #[serde(default)]
    pub shift_key: bool,
    /// Meta (Command/Windows) held.
    #[serde(default)]
    pub meta_key: bool,
}

impl KeyEvent {
    /// An event for `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Builder: hold Control.
    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    /// Builder: hold Alt.
    #[must_use]
    pub fn alt(mut self) -> Self {
        self.alt_key = true;
        self
    }

    /// Builder: hold Shift.
    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Builder: hold Meta.
    #[must_use]
    pub fn meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// True when this is an Escape press.
    pub fn is_escape(&self) -> bool {
        self.key == ESCAPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_dom_field_names() {
        let ev: KeyEvent =
            serde_json::from_str(r#"{"key":"k","ctrlKey":true,"shiftKey":true}"#).expect("parse");
        assert_eq!(ev, KeyEvent::new("k").ctrl().shift());
        assert!(!ev.is_escape());
        assert!(KeyEvent::new("Escape").is_escape());
    }
}
