//! Arena-backed in-memory page.

use tracing::trace;

use crate::{Document, DomError, ListenerKind, NodeId, Page, Result, css, xpath};

/// Child slot of an element: another element or a text run.
#[derive(Debug, Clone)]
enum Child {
    /// Element child.
    Element(NodeId),
    /// Text node.
    Text(String),
}

/// Arena entry for one element.
#[derive(Debug, Clone)]
struct NodeData {
    /// Lower-cased tag name.
    tag: String,
    /// Attributes in insertion order, names lower-cased.
    attrs: Vec<(String, String)>,
    /// Children in document order.
    children: Vec<Child>,
    /// Parent element; `None` for the root and detached subtrees.
    parent: Option<NodeId>,
    /// Inline style properties.
    style: Vec<(String, String)>,
    /// Number of native activations.
    clicks: usize,
}

impl NodeData {
    /// Fresh, detached element.
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
            style: Vec::new(),
            clicks: 0,
        }
    }
}

/// Content of an [`Element`] template.
#[derive(Debug, Clone)]
enum Content {
    /// Nested element.
    Element(Element),
    /// Text run.
    Text(String),
}

/// Builder for a subtree to insert into a [`MemoryDom`].
///
/// ```
/// use pagedom::{Element, MemoryDom};
///
/// let mut dom = MemoryDom::new();
/// let body = dom.body();
/// dom.append(body, Element::new("button").class("btn").text("Save"));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag name.
    tag: String,
    /// Attributes.
    attrs: Vec<(String, String)>,
    /// Children in order.
    content: Vec<Content>,
}

impl Element {
    /// An empty element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        set_pair(&mut self.attrs, &name.to_ascii_lowercase(), value);
        self
    }

    /// Append a text run.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.content.push(Content::Text(text.to_string()));
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.content.push(Content::Element(child));
        self
    }
}

/// Insert or replace `name` in an ordered pair list.
fn set_pair(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value.to_string(),
        None => pairs.push((name.to_string(), value.to_string())),
    }
}

/// Editability implied by a `contenteditable` value; `None` means inherit.
fn editable_value(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "plaintext-only" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// An in-memory page: an arena of elements under `<html>`, with `<head>` and
/// `<body>` created up front.
///
/// Besides implementing [`Document`] and [`Page`], it records what the core did
/// to it (clicks, listeners, cursor, inline styles) so callers can observe the
/// effects.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    /// Element arena indexed by `NodeId`.
    nodes: Vec<NodeData>,
    /// `<html>`.
    root: NodeId,
    /// `<head>`.
    head: NodeId,
    /// `<body>`.
    body: NodeId,
    /// Focused element.
    focused: Option<NodeId>,
    /// Body cursor override.
    cursor: Option<String>,
    /// Attached capture listeners.
    listeners: Vec<ListenerKind>,
    /// Every click in order.
    click_log: Vec<NodeId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty `<html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            head: NodeId::new(0),
            body: NodeId::new(0),
            focused: None,
            cursor: None,
            listeners: Vec::new(),
            click_log: Vec::new(),
        };
        dom.root = dom.alloc(NodeData::new("html"));
        dom.head = dom.append(dom.root, Element::new("head"));
        dom.body = dom.append(dom.root, Element::new("body"));
        dom
    }

    /// The `<head>` element.
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Push a node into the arena.
    fn alloc(&mut self, data: NodeData) -> NodeId {
        let raw = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(data);
        NodeId::new(raw)
    }

    /// Arena entry for `node`.
    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.raw() as usize)
    }

    /// Mutable arena entry for `node`.
    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.raw() as usize)
    }

    /// Materialize a template into detached arena nodes.
    fn build(&mut self, template: Element) -> NodeId {
        let mut data = NodeData::new(&template.tag);
        data.attrs = template.attrs;
        let id = self.alloc(data);
        for content in template.content {
            let child = match content {
                Content::Text(t) => Child::Text(t),
                Content::Element(e) => {
                    let c = self.build(e);
                    if let Some(n) = self.node_mut(c) {
                        n.parent = Some(id);
                    }
                    Child::Element(c)
                }
            };
            if let Some(n) = self.node_mut(id) {
                n.children.push(child);
            }
        }
        id
    }

    /// True when `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.node(n).and_then(|d| d.parent);
        }
        false
    }

    /// Build `template` and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, template: Element) -> NodeId {
        let id = self.build(template);
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(Child::Element(id));
        }
        id
    }

    /// Build `template` and insert it immediately before `reference`.
    pub fn insert_before(&mut self, reference: NodeId, template: Element) -> Result<NodeId> {
        let parent = self
            .node(reference)
            .and_then(|d| d.parent)
            .ok_or(DomError::UnknownNode(reference))?;
        let id = self.build(template);
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            let at = p
                .children
                .iter()
                .position(|c| matches!(c, Child::Element(e) if *e == reference))
                .unwrap_or(p.children.len());
            p.children.insert(at, Child::Element(id));
        }
        Ok(id)
    }

    /// Append a text run to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(Child::Text(text.to_string()));
        }
    }

    /// Replace all children of `node` with a single text run.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(p) = self.node_mut(node) {
            p.children = vec![Child::Text(text.to_string())];
        }
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|d| d.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children
                .retain(|c| !matches!(c, Child::Element(e) if *e == node));
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
        if self.focused.is_some_and(|f| !self.is_attached(f)) {
            self.focused = None;
        }
    }

    /// Set an attribute on `node`.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            set_pair(&mut n.attrs, &name.to_ascii_lowercase(), value);
        }
    }

    /// Remove an attribute from `node`.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(n) = self.node_mut(node) {
            n.attrs.retain(|(k, _)| *k != name);
        }
    }

    /// Move keyboard focus; `None` blurs.
    pub fn focus(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    /// Number of native clicks `node` received.
    pub fn clicks(&self, node: NodeId) -> usize {
        self.node(node).map_or(0, |d| d.clicks)
    }

    /// Every click in order.
    pub fn click_log(&self) -> &[NodeId] {
        &self.click_log
    }

    /// Attached capture listeners.
    pub fn listeners(&self) -> &[ListenerKind] {
        &self.listeners
    }

    /// Current body cursor override.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

impl Document for MemoryDom {
    fn document_element(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|d| d.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.node(node)?
            .attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.node(node).map(|d| d.attrs.clone()).unwrap_or_default()
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|d| {
                d.children
                    .iter()
                    .filter_map(|c| match c {
                        Child::Element(e) => Some(*e),
                        Child::Text(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut pending: Vec<Child> = Vec::new();
        if let Some(d) = self.node(node) {
            pending.extend(d.children.iter().rev().cloned());
        }
        while let Some(child) = pending.pop() {
            match child {
                Child::Text(t) => out.push_str(&t),
                Child::Element(e) => {
                    if let Some(d) = self.node(e) {
                        pending.extend(d.children.iter().rev().cloned());
                    }
                }
            }
        }
        out
    }

    fn is_content_editable(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(editable) = self
                .attribute(n, "contenteditable")
                .and_then(|v| editable_value(&v))
            {
                return editable;
            }
            cur = self.parent_element(n);
        }
        false
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
            .filter(|f| self.is_attached(*f))
            .or(Some(self.body))
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        css::query_all(self, selector)
    }

    fn evaluate_xpath(&self, expr: &str) -> Result<Option<NodeId>> {
        xpath::evaluate_first(self, expr)
    }
}

impl Page for MemoryDom {
    fn click(&mut self, node: NodeId) -> Result<()> {
        if !self.is_attached(node) {
            return Err(DomError::UnknownNode(node));
        }
        if let Some(d) = self.node_mut(node) {
            d.clicks += 1;
        }
        self.click_log.push(node);
        trace!(node = node.raw(), "click");
        Ok(())
    }

    fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)?
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    fn set_style_property(&mut self, node: NodeId, property: &str, value: Option<&str>) {
        if let Some(d) = self.node_mut(node) {
            match value {
                Some(v) if !v.is_empty() => set_pair(&mut d.style, property, v),
                _ => d.style.retain(|(k, _)| k != property),
            }
        }
    }

    fn set_cursor(&mut self, cursor: Option<&str>) {
        self.cursor = cursor.map(str::to_string);
    }

    fn show_hint(&mut self, id: &str, text: &str) {
        self.remove_hint(id);
        let body = self.body;
        self.append(body, Element::new("div").id(id).text(text));
    }

    fn remove_hint(&mut self, id: &str) {
        if let Some(node) = self.element_by_id(id) {
            self.remove(node);
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        if !self.listeners.contains(&kind) {
            self.listeners.push(kind);
        }
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.listeners.retain(|k| *k != kind);
    }
}
