use std::time::{SystemTime, UNIX_EPOCH};

use elements::{ElementType, SelectorDescriptor};
use keychord::normalize;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{PageLocation, UrlPattern};

/// Alphabet of the random id suffix.
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// A shortcut bound to a page element. Serialized as camelCase JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBinding {
    /// Unique id, see [`generate_id`].
    pub id: String,
    /// Host name the binding applies to.
    pub domain: String,
    /// Optional URL wildcard pattern that also activates the binding.
    #[serde(default)]
    pub url: String,
    /// Handler family used to resolve and activate the element.
    pub element_type: ElementType,
    /// Fingerprint of the element.
    pub selector: SelectorDescriptor,
    /// Chord as captured, e.g. `Ctrl+Shift+K`.
    pub key: String,
    /// User description, shown in notices.
    #[serde(default)]
    pub description: String,
    /// Fire even while focus is in a text-entry element.
    #[serde(default)]
    pub ignore_input_focus: bool,
    /// Disabled bindings are kept but never active.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Creation time, unix milliseconds.
    #[serde(default)]
    pub created_at: u64,
}

/// Serde default for [`KeyBinding::enabled`].
const fn default_enabled() -> bool {
    true
}

impl KeyBinding {
    /// The comparison form of `key`.
    pub fn normalized_key(&self) -> String {
        normalize(&self.key)
    }

    /// True when this binding is active on `location`: enabled, and either the
    /// domain equals the host name or the URL pattern matches.
    pub fn applies_to(&self, location: &PageLocation) -> bool {
        if !self.enabled {
            return false;
        }
        if self.domain == location.hostname() {
            return true;
        }
        if self.url.is_empty() {
            return false;
        }
        match UrlPattern::new(&self.url) {
            Ok(p) => p.matches(location.href()),
            Err(e) => {
                warn!(id = %self.id, pattern = %self.url, error = %e, "unusable url pattern");
                false
            }
        }
    }
}

/// Current time in unix milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// A fresh binding id: `binding_<millis>_<9 base36 chars>`.
pub fn generate_id<R: Rng + ?Sized>(now_ms: u64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("binding_{now_ms}_{suffix}")
}
