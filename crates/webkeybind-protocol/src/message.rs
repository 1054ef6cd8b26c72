use std::fmt::Display;

use bindings::KeyBinding;
use elements::{ElementType, SelectorDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Action, ProtocolError};

/// The serializable part of a picked element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionData {
    /// Handler family that claimed the element.
    pub element_type: ElementType,
    /// Its descriptor.
    pub selector: SelectorDescriptor,
}

/// A request, tagged by `action` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Insert or replace `binding`.
    SaveBinding {
        /// Binding to store.
        binding: KeyBinding,
    },
    /// Delete the binding with `id`.
    DeleteBinding {
        /// Binding id.
        id: String,
    },
    /// List bindings, restricted to `domain` when given.
    GetBindings {
        /// Domain filter; empty or absent means all.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
    },
    /// Hand a picked element to the background.
    ElementSelected {
        /// The selection.
        data: SelectionData,
    },
    /// Enter selection mode.
    StartElementSelection,
    /// Re-derive the active set.
    ReloadBindings,
    /// Trigger `binding` once.
    TestBinding {
        /// Binding to trigger.
        binding: KeyBinding,
    },
}

impl Request {
    /// The action tag of this request.
    pub fn action(&self) -> Action {
        match self {
            Self::SaveBinding { .. } => Action::SaveBinding,
            Self::DeleteBinding { .. } => Action::DeleteBinding,
            Self::GetBindings { .. } => Action::GetBindings,
            Self::ElementSelected { .. } => Action::ElementSelected,
            Self::StartElementSelection => Action::StartElementSelection,
            Self::ReloadBindings => Action::ReloadBindings,
            Self::TestBinding { .. } => Action::TestBinding,
        }
    }

    /// Decode a raw message, telling unknown actions apart from bad payloads.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let name = value
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(action) = name.as_deref().and_then(Action::try_from_str) else {
            return Err(ProtocolError::UnknownAction(name));
        };
        serde_json::from_value(value).map_err(|e| ProtocolError::Malformed {
            action: action.as_str().to_string(),
            message: e.to_string(),
        })
    }

    /// Encode as a JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Reply to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the action succeeded.
    pub success: bool,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Payload of `getBindings`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<Vec<KeyBinding>>,
}

impl Response {
    /// `{success: true}`
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// `{success: true, bindings}`
    pub fn with_bindings(bindings: Vec<KeyBinding>) -> Self {
        Self {
            success: true,
            bindings: Some(bindings),
            ..Self::default()
        }
    }

    /// `{success: false, error}`
    pub fn failure(error: impl Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            bindings: None,
        }
    }
}

impl From<ProtocolError> for Response {
    fn from(e: ProtocolError) -> Self {
        Self::failure(e)
    }
}
