use tracing::debug;

use crate::{KeyBinding, PageLocation};

/// A binding together with its precomputed comparison key.
#[derive(Clone, Debug)]
struct Entry {
    /// `normalize(binding.key)`.
    normalized: String,
    /// The binding.
    binding: KeyBinding,
}

/// The bindings applicable to one loaded page, in stored order.
///
/// Derived from the persisted collection and thrown away on reload.
#[derive(Clone, Debug, Default)]
pub struct ActiveSet {
    /// Applicable bindings.
    entries: Vec<Entry>,
}

impl ActiveSet {
    /// Keep the bindings of `all` that apply to `location`.
    pub fn derive(all: impl IntoIterator<Item = KeyBinding>, location: &PageLocation) -> Self {
        let entries: Vec<Entry> = all
            .into_iter()
            .filter(|b| b.applies_to(location))
            .map(|binding| Entry {
                normalized: binding.normalized_key(),
                binding,
            })
            .collect();
        debug!(
            host = location.hostname(),
            count = entries.len(),
            "derived active set"
        );
        Self { entries }
    }

    /// Number of active bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active bindings in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.entries.iter().map(|e| &e.binding)
    }

    /// Bindings whose normalized key equals `normalized`, in stored order.
    pub(crate) fn with_key(&self, normalized: String) -> impl Iterator<Item = &KeyBinding> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.normalized == normalized)
            .map(|e| &e.binding)
    }
}
