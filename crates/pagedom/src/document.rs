use crate::{Result, css};

/// Opaque handle to an element of a page.
///
/// Handles are only meaningful for the page that issued them. A handle stays
/// valid after its element is detached, but queries no longer return it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Construct a handle from a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index of this handle.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Read access to the element tree of a page.
pub trait Document {
    /// The root element (`<html>`), if the document has one.
    fn document_element(&self) -> Option<NodeId>;

    /// Lower-cased tag name of `node`.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    /// Value of attribute `name` on `node`.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Every attribute of `node` as `(name, value)`, names lower-cased.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    /// Parent element of `node`; `None` for the root and for detached subtrees.
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    /// Element children of `node` in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Concatenated text of `node` and its descendants, untrimmed.
    fn text_content(&self, node: NodeId) -> String;

    /// True when `node` is editable through `contenteditable` (own or inherited).
    fn is_content_editable(&self, node: NodeId) -> bool;

    /// The element holding keyboard focus, if any.
    fn active_element(&self) -> Option<NodeId>;

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>>;

    /// The first node, in document order, selected by an XPath expression.
    fn evaluate_xpath(&self, expr: &str) -> Result<Option<NodeId>>;

    /// Non-empty `id` attribute of `node`.
    fn id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id").filter(|v| !v.is_empty())
    }

    /// Whitespace-separated entries of the `class` attribute.
    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// True when `class` is one of the entries of the `class` attribute.
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    /// Every attached element in document (pre-)order, starting at the root.
    fn all_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.document_element().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }

    /// Element siblings that precede `node` under the same parent.
    fn previous_siblings(&self, node: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent_element(node) else {
            return Vec::new();
        };
        self.children(parent)
            .into_iter()
            .take_while(|c| *c != node)
            .collect()
    }

    /// The element whose `id` equals `id`, if any.
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_selector_all(&format!("#{}", css::escape_ident(id)))
            .ok()
            .and_then(|v| v.into_iter().next())
    }
}

/// Document events the picker listens for in the capture phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// `mousemove`
    PointerMove,
    /// `click`
    Click,
    /// `keydown`
    KeyDown,
}

impl ListenerKind {
    /// Every listener kind.
    pub const ALL: [Self; 3] = [Self::PointerMove, Self::Click, Self::KeyDown];
}

/// Pointer event delivered to a capture listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    /// The element the pointer is over.
    pub target: NodeId,
}

/// What a listener asks the page to do with the event it handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Disposition {
    /// Call `preventDefault()`.
    pub prevent_default: bool,
    /// Call `stopPropagation()`.
    pub stop_propagation: bool,
}

impl Disposition {
    /// Let the event through untouched.
    pub const PASS: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    /// Stop propagation only.
    pub const STOP: Self = Self {
        prevent_default: false,
        stop_propagation: true,
    };

    /// Prevent the default action and stop propagation.
    pub const CONSUME: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// Page mutations performed by the core.
pub trait Page: Document {
    /// Run the element's native activation behavior (`HTMLElement.click()`).
    fn click(&mut self, node: NodeId) -> Result<()>;

    /// Inline style property of `node` (e.g. `outline`).
    fn style_property(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set or clear (`None`) an inline style property of `node`.
    fn set_style_property(&mut self, node: NodeId, property: &str, value: Option<&str>);

    /// Set or clear the document body cursor.
    fn set_cursor(&mut self, cursor: Option<&str>);

    /// Insert a transient hint overlay element with the given id and text.
    fn show_hint(&mut self, id: &str, text: &str);

    /// Remove the hint overlay with the given id, if present.
    fn remove_hint(&mut self, id: &str);

    /// Attach a capture-phase document listener.
    fn add_listener(&mut self, kind: ListenerKind);

    /// Detach a capture-phase document listener; absent listeners are ignored.
    fn remove_listener(&mut self, kind: ListenerKind);
}
