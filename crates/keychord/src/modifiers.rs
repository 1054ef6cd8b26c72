use serde::{Deserialize, Serialize};

use crate::KeyEvent;

/// Modifier keys observable from a page.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    /// All modifiers in canonical chord order.
    pub const ORDERED: [Self; 4] = [Self::Ctrl, Self::Alt, Self::Shift, Self::Meta];

    /// Parses a modifier spec, case-insensitively.
    ///
    /// Accepts the canonical names plus common aliases (control, opt/option,
    /// cmd/command/win/super).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "opt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "meta" | "cmd" | "command" | "win" | "super" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Returns the canonical spec string for this modifier.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Meta",
        }
    }

    /// Position of this modifier in a captured chord.
    pub(crate) fn order(self) -> usize {
        match self {
            Self::Ctrl => 0,
            Self::Alt => 1,
            Self::Shift => 2,
            Self::Meta => 3,
        }
    }

    /// True when `key` is the DOM key name of a bare modifier press.
    pub fn is_modifier_key(key: &str) -> bool {
        matches!(key, "Control" | "Alt" | "Shift" | "Meta")
    }

    /// True when this modifier is held in `ev`.
    pub fn held_in(self, ev: &KeyEvent) -> bool {
        match self {
            Self::Ctrl => ev.ctrl_key,
            Self::Alt => ev.alt_key,
            Self::Shift => ev.shift_key,
            Self::Meta => ev.meta_key,
        }
    }
}
