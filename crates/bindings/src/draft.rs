use elements::{ElementType, SelectorDescriptor};
use keychord::Chord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{KeyBinding, generate_id};

/// Why a draft cannot become a binding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// No shortcut was captured.
    #[error("A shortcut key is required")]
    MissingKey,
    /// No description was entered.
    #[error("A description is required")]
    MissingDescription,
    /// The shortcut does not parse as a chord.
    #[error("'{0}' is not a valid shortcut")]
    InvalidKey(String),
}

/// The user-entered half of a binding, before an id and element are attached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingDraft {
    /// Captured chord, e.g. `Ctrl+Shift+K`.
    pub key: String,
    /// Description shown in notices and listings.
    pub description: String,
    /// Optional URL wildcard pattern.
    #[serde(default)]
    pub url: String,
    /// Fire even while typing.
    #[serde(default)]
    pub ignore_input_focus: bool,
}

impl BindingDraft {
    /// The entered chord without surrounding whitespace, except that a space
    /// key after the final `+` is kept.
    fn key_text(&self) -> &str {
        let key = self.key.trim_start();
        let end = key.trim_end();
        if end.ends_with('+') && !end.ends_with("++") && end.len() < key.len() {
            &key[..=end.len()]
        } else {
            end
        }
    }

    /// Check required fields after trimming.
    pub fn validate(&self) -> Result<(), DraftError> {
        let key = self.key_text();
        if key.is_empty() {
            return Err(DraftError::MissingKey);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if Chord::parse(key).is_none() {
            return Err(DraftError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    /// Build a new, enabled binding for `domain` from this draft and a picked
    /// element.
    pub fn into_binding<R: Rng + ?Sized>(
        self,
        domain: &str,
        element_type: ElementType,
        selector: SelectorDescriptor,
        now_ms: u64,
        rng: &mut R,
    ) -> Result<KeyBinding, DraftError> {
        self.validate()?;
        Ok(KeyBinding {
            id: generate_id(now_ms, rng),
            domain: domain.to_string(),
            url: self.url.trim().to_string(),
            element_type,
            selector,
            key: self.key_text().to_string(),
            description: self.description.trim().to_string(),
            ignore_input_focus: self.ignore_input_focus,
            enabled: true,
            created_at: now_ms,
        })
    }
}
