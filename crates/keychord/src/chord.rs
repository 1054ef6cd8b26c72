use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{KeyEvent, Modifier};

/// A key chord: a set of modifiers plus a single non-modifier key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Set of modifier keys held down for this chord.
    pub modifiers: HashSet<Modifier>,
    /// The non-modifier key, single characters upper-cased.
    pub key: String,
}

/// Upper-case single-character keys; named keys are kept as-is.
fn key_token(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}

/// Normalizes a chord string for comparison.
///
/// Splits on `+`, trims each token, upper-cases single-character tokens,
/// sorts lexicographically and rejoins with `+`. The result is independent of
/// the order the chord was authored or pressed in, and normalizing twice
/// yields the same string.
pub fn normalize(spec: &str) -> String {
    let mut tokens: Vec<String> = spec.split('+').map(|t| key_token(t.trim())).collect();
    tokens.sort();
    tokens.join("+")
}

impl Chord {
    /// Builds the chord for a key event.
    ///
    /// Returns `None` for modifier-only presses and events without a key.
    /// A bare key with no modifiers is a valid chord.
    pub fn from_event(ev: &KeyEvent) -> Option<Self> {
        if ev.key.is_empty() || Modifier::is_modifier_key(&ev.key) {
            return None;
        }
        let modifiers = Modifier::ORDERED
            .into_iter()
            .filter(|m| m.held_in(ev))
            .collect();
        Some(Self {
            modifiers,
            key: key_token(&ev.key),
        })
    }

    /// Builds the chord for a key event captured while authoring a binding.
    ///
    /// Stricter than [`Chord::from_event`]: at least one modifier must be held.
    pub fn capture(ev: &KeyEvent) -> Option<Self> {
        Self::from_event(ev).filter(|c| !c.modifiers.is_empty())
    }

    /// Parses a chord specification of the form "Ctrl+Shift+K".
    ///
    /// - Case-insensitive for modifiers; single-character keys are upper-cased.
    /// - Components are separated by "+"; the last component is always the key.
    /// - A trailing "++" denotes the plus key itself.
    /// - A whitespace-only last component is the space key.
    pub fn parse(s: &str) -> Option<Self> {
        let (mods_raw, key_raw) = if s == "+" {
            ("", "+")
        } else if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else {
            match s.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", s),
            }
        };
        let key_trimmed = match key_raw.trim() {
            "" if !key_raw.is_empty() => " ",
            k => k,
        };
        if key_trimmed.is_empty() || Modifier::is_modifier_key(key_trimmed) {
            return None;
        }
        let mut modifiers = HashSet::new();
        if !mods_raw.is_empty() {
            for m in mods_raw.split('+') {
                modifiers.insert(Modifier::from_spec(m)?);
            }
        }
        Some(Self {
            modifiers,
            key: key_token(key_trimmed),
        })
    }

    /// Returns the capture-order string form: `Ctrl, Alt, Shift, Meta`, then the key.
    pub fn to_string_canonical(&self) -> String {
        let mut mods: Vec<Modifier> = self.modifiers.iter().copied().collect();
        mods.sort_by_key(|m| m.order());
        let mut out: Vec<&str> = mods.into_iter().map(Modifier::to_spec).collect();
        out.push(&self.key);
        out.join("+")
    }

    /// The comparison form of this chord, see [`normalize`].
    pub fn normalized(&self) -> String {
        normalize(&self.to_string_canonical())
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_chord_order_is_fixed() {
        let ev = KeyEvent::new("k").meta().shift().ctrl().alt();
        let c = Chord::from_event(&ev).expect("chord");
        assert_eq!(c.to_string(), "Ctrl+Alt+Shift+Meta+K");
    }

    #[test]
    fn named_keys_kept_as_is() {
        let c = Chord::from_event(&KeyEvent::new("Enter").ctrl()).expect("chord");
        assert_eq!(c.to_string(), "Ctrl+Enter");
        let bare = Chord::from_event(&KeyEvent::new("/")).expect("bare key");
        assert_eq!(bare.to_string(), "/");
    }

    #[test]
    fn modifier_only_presses_are_discarded() {
        assert!(Chord::from_event(&KeyEvent::new("Control").ctrl()).is_none());
        assert!(Chord::from_event(&KeyEvent::new("Shift").shift()).is_none());
        assert!(Chord::from_event(&KeyEvent::new("")).is_none());
    }

    #[test]
    fn capture_requires_a_modifier() {
        assert!(Chord::capture(&KeyEvent::new("k")).is_none());
        let c = Chord::capture(&KeyEvent::new("k").alt()).expect("capture");
        assert_eq!(c.to_string(), "Alt+K");
    }

    #[test]
    fn normalize_is_order_independent() {
        assert_eq!(normalize("Shift+Ctrl+K"), normalize("Ctrl+Shift+K"));
        assert_eq!(normalize("ctrl+k"), "K+ctrl");
        assert_eq!(normalize(" Alt + s "), "Alt+S");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "Shift+Ctrl+K",
            "Meta+Alt+Enter",
            "a",
            "Ctrl++",
            "ß+Ctrl",
            "",
            " x + y ",
        ];
        for s in inputs {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "idempotent for {s:?}");
        }
    }

    #[test]
    fn parse_roundtrips_through_display() {
        let c = Chord::parse("shift+ctrl+k").expect("parse");
        assert!(c.modifiers.contains(&Modifier::Shift));
        assert!(c.modifiers.contains(&Modifier::Ctrl));
        assert_eq!(c.key, "K");
        assert_eq!(c.to_string(), "Ctrl+Shift+K");
        assert_eq!(Chord::parse(&c.to_string()), Some(c));
    }

    #[test]
    fn parse_plus_key_and_rejects_garbage() {
        let plus = Chord::parse("Ctrl++").expect("plus");
        assert_eq!(plus.key, "+");
        assert!(plus.modifiers.contains(&Modifier::Ctrl));
        assert!(Chord::parse("Ctrl+").is_none());
        assert!(Chord::parse("Hyper+K").is_none());
        assert!(Chord::parse("Ctrl+Shift").is_none());
    }

    #[test]
    fn space_key_survives_capture_and_parse() {
        let captured = Chord::capture(&KeyEvent::new(" ").ctrl()).expect("capture");
        let text = captured.to_string();
        assert_eq!(text, "Ctrl+ ");
        assert_eq!(Chord::parse(&text), Some(captured.clone()));
        let live = Chord::from_event(&KeyEvent::new(" ").ctrl()).expect("chord");
        assert_eq!(live.normalized(), normalize(&text));
    }

    #[test]
    fn event_and_stored_strings_compare_equal() {
        let live = Chord::from_event(&KeyEvent::new("k").shift().ctrl()).expect("chord");
        assert_eq!(live.normalized(), normalize("Shift+Ctrl+K"));
    }
}
