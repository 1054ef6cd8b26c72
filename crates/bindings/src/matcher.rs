use keychord::normalize;
use tracing::debug;

use crate::{ActiveSet, FocusContext, KeyBinding};

/// Finds the binding a chord should fire.
#[derive(Clone, Copy, Debug, Default)]
pub struct BindingMatcher;

impl BindingMatcher {
    /// A matcher.
    pub fn new() -> Self {
        Self
    }

    /// The first binding, in stored order, whose key matches `chord` and that
    /// passes the focus guard. A binding blocked by the guard does not stop the
    /// scan.
    pub fn find<'a>(
        &self,
        active: &'a ActiveSet,
        chord: &str,
        focus: FocusContext,
    ) -> Option<&'a KeyBinding> {
        active.with_key(normalize(chord)).find(|b| {
            let blocked = focus.in_text_entry && !b.ignore_input_focus;
            if blocked {
                debug!(id = %b.id, "skipped: focus in text entry");
            }
            !blocked
        })
    }
}

#[cfg(test)]
mod tests {
    use elements::{ElementType, SelectorDescriptor};

    use super::*;
    use crate::PageLocation;

    fn binding(id: &str, key: &str, ignore_input_focus: bool) -> KeyBinding {
        KeyBinding {
            id: id.into(),
            domain: "example.com".into(),
            url: String::new(),
            element_type: ElementType::Button,
            selector: SelectorDescriptor::default(),
            key: key.into(),
            description: id.into(),
            ignore_input_focus,
            enabled: true,
            created_at: 0,
        }
    }

    fn active(bindings: Vec<KeyBinding>) -> ActiveSet {
        let here = PageLocation::parse("https://example.com/").expect("url");
        ActiveSet::derive(bindings, &here)
    }

    #[test]
    fn matches_regardless_of_authored_order() {
        let set = active(vec![binding("a", "Shift+Ctrl+k", false)]);
        let m = BindingMatcher::new();
        let hit = m.find(&set, "Ctrl+Shift+K", FocusContext::default());
        assert_eq!(hit.map(|b| b.id.as_str()), Some("a"));
        assert!(m.find(&set, "Ctrl+K", FocusContext::default()).is_none());
    }

    #[test]
    fn match_outlives_the_chord_text() {
        let set = active(vec![binding("a", "Ctrl+K", false)]);
        let hit = {
            let chord = String::from("K+Ctrl");
            BindingMatcher::new().find(&set, &chord, FocusContext::default())
        };
        assert_eq!(hit.map(|b| b.id.as_str()), Some("a"));
        let keyed: Vec<&str> = set
            .with_key(normalize("Ctrl+K"))
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(keyed, vec!["a"]);
    }

    #[test]
    fn focus_guard_skips_and_continues() {
        let set = active(vec![
            binding("guarded", "Ctrl+K", false),
            binding("anywhere", "Ctrl+K", true),
        ]);
        let m = BindingMatcher::new();
        let typing = FocusContext {
            in_text_entry: true,
        };
        assert_eq!(
            m.find(&set, "Ctrl+K", typing).map(|b| b.id.as_str()),
            Some("anywhere")
        );
        assert_eq!(
            m.find(&set, "Ctrl+K", FocusContext::default())
                .map(|b| b.id.as_str()),
            Some("guarded")
        );
    }

    #[test]
    fn all_guarded_means_no_match() {
        let set = active(vec![binding("guarded", "Ctrl+K", false)]);
        let typing = FocusContext {
            in_text_entry: true,
        };
        assert!(BindingMatcher::new().find(&set, "Ctrl+K", typing).is_none());
    }

    #[test]
    fn bare_keys_match() {
        let set = active(vec![binding("slash", "/", false)]);
        assert!(
            BindingMatcher::new()
                .find(&set, "/", FocusContext::default())
                .is_some()
        );
    }

    #[test]
    fn derive_filters_disabled_and_foreign() {
        let mut off = binding("off", "Ctrl+A", false);
        off.enabled = false;
        let mut foreign = binding("foreign", "Ctrl+B", false);
        foreign.domain = "other.test".into();
        let mut pattern = binding("pattern", "Ctrl+C", false);
        pattern.domain = "other.test".into();
        pattern.url = "https://example.com/*".into();
        let set = active(vec![off, foreign, pattern, binding("on", "Ctrl+D", false)]);
        let ids: Vec<&str> = set.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["pattern", "on"]);
        assert_eq!(set.len(), 2);
    }
}
