use pagedom::{Document, NodeId};

/// `<input>` types that do not take text.
const NON_TEXT_INPUT_TYPES: [&str; 7] = [
    "button", "checkbox", "radio", "file", "submit", "reset", "image",
];

/// True when `element` takes typed text: a text-like `<input>`, a
/// `<textarea>`, or anything content-editable.
pub fn is_text_entry(doc: &dyn Document, element: NodeId) -> bool {
    match doc.tag_name(element).as_deref() {
        Some("textarea") => return true,
        Some("input") => {
            let ty = doc
                .attribute(element, "type")
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_default();
            if !NON_TEXT_INPUT_TYPES.contains(&ty.as_str()) {
                return true;
            }
        }
        _ => {}
    }
    doc.is_content_editable(element)
}

/// Where keyboard focus is when a chord is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusContext {
    /// Focus is in a text-entry element.
    pub in_text_entry: bool,
}

impl FocusContext {
    /// Inspect the focused element of `doc`.
    pub fn of(doc: &dyn Document) -> Self {
        Self {
            in_text_entry: doc
                .active_element()
                .is_some_and(|e| is_text_entry(doc, e)),
        }
    }
}
