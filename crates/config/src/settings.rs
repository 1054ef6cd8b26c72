//! Settings sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, defaults};

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Element picker appearance and behavior.
    #[serde(default)]
    pub picker: PickerSettings,
    /// Selector synthesis.
    #[serde(default)]
    pub selector: SelectorSettings,
    /// User notices.
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Storage keys and limits.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Settings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        let fail = |message: &str| Error::Validation {
            path: None,
            message: message.to_string(),
        };
        if self.picker.climb_depth == 0 {
            return Err(fail("picker.climb_depth must be at least 1"));
        }
        if self.selector.max_depth == 0 {
            return Err(fail("selector.max_depth must be at least 1"));
        }
        if self.picker.hint_id.trim().is_empty() {
            return Err(fail("picker.hint_id must not be empty"));
        }
        if self.storage.bindings_key.is_empty() || self.storage.pending_selection_key.is_empty() {
            return Err(fail("storage keys must not be empty"));
        }
        if self.storage.bindings_key == self.storage.pending_selection_key {
            return Err(fail(
                "storage.bindings_key and storage.pending_selection_key must differ",
            ));
        }
        Ok(())
    }
}

/// Element picker section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickerSettings {
    /// Inline `outline` applied to the hovered element.
    #[serde(default = "defaults::default_highlight_outline")]
    pub highlight_outline: String,
    /// Inline `outline-offset` applied to the hovered element.
    #[serde(default = "defaults::default_highlight_offset")]
    pub highlight_offset: String,
    /// Element id of the hint overlay.
    #[serde(default = "defaults::default_hint_id")]
    pub hint_id: String,
    /// Text of the hint overlay.
    #[serde(default = "defaults::default_hint_text")]
    pub hint_text: String,
    /// Body cursor while picking.
    #[serde(default = "defaults::default_cursor")]
    pub cursor: String,
    /// Elements inspected, starting at the event target, when looking for an
    /// interactive ancestor.
    #[serde(default = "defaults::default_climb_depth")]
    pub climb_depth: usize,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            highlight_outline: defaults::default_highlight_outline(),
            highlight_offset: defaults::default_highlight_offset(),
            hint_id: defaults::default_hint_id(),
            hint_text: defaults::default_hint_text(),
            cursor: defaults::default_cursor(),
            climb_depth: defaults::CLIMB_DEPTH,
        }
    }
}

/// Selector synthesis section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorSettings {
    /// Maximum levels in a synthesized CSS path.
    #[serde(default = "defaults::default_selector_max_depth")]
    pub max_depth: usize,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            max_depth: defaults::SELECTOR_MAX_DEPTH,
        }
    }
}

/// Notice section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
    /// How long a host should keep a notice on screen, in milliseconds.
    #[serde(default = "defaults::default_notice_duration_ms")]
    pub duration_ms: u64,
}

impl NotificationSettings {
    /// Display duration as a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            duration_ms: defaults::NOTICE_DURATION_MS,
        }
    }
}

/// Storage section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSettings {
    /// Key of the persisted binding collection.
    #[serde(default = "defaults::default_bindings_key")]
    pub bindings_key: String,
    /// Scratch key for the selection handoff.
    #[serde(default = "defaults::default_pending_selection_key")]
    pub pending_selection_key: String,
    /// Per-item byte quota of the synced store; `None` disables the check.
    #[serde(default = "defaults::default_sync_quota_bytes")]
    pub sync_quota_bytes: Option<usize>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bindings_key: defaults::default_bindings_key(),
            pending_selection_key: defaults::default_pending_selection_key(),
            sync_quota_bytes: defaults::default_sync_quota_bytes(),
        }
    }
}
