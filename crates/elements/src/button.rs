use pagedom::{Document, DomError, NodeId, Page, css, xpath};
use tracing::debug;

use crate::{ElementHandler, ElementType, SelectorDescriptor};

/// Default number of ancestor levels in a synthesized CSS path.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Attributes that identify an element well enough to go into its CSS path.
/// The first one present wins.
const IDENTIFYING_ATTRS: [&str; 4] = ["data-testid", "data-id", "name", "aria-label"];

/// Classes that mark an element as button-like.
const BUTTON_CLASSES: [&str; 2] = ["btn", "button"];

/// Handles `<button>`, `<input type=button|submit>`, `role="button"` and
/// elements styled as buttons through a `btn` or `button` class.
#[derive(Debug, Clone)]
pub struct ButtonHandler {
    /// Cap on the number of levels in a CSS path.
    max_depth: usize,
}

impl Default for ButtonHandler {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ButtonHandler {
    /// A handler whose CSS paths climb at most `max_depth` levels.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// Selector for a single level: `tag.class1.class2[attr="value"]`.
    fn level_selector(doc: &dyn Document, node: NodeId) -> String {
        let mut sel = doc.tag_name(node).unwrap_or_else(|| "*".to_string());
        for class in doc.class_list(node) {
            sel.push('.');
            sel.push_str(&css::escape_ident(&class));
        }
        let attr = IDENTIFYING_ATTRS.iter().find_map(|name| {
            doc.attribute(node, name)
                .filter(|v| !v.is_empty())
                .map(|v| (*name, v))
        });
        if let Some((name, value)) = attr {
            sel.push_str(&format!("[{name}=\"{}\"]", css::escape_string(&value)));
        }
        sel
    }

    /// Ancestor-climbed CSS path, stopping once it is unique.
    fn css_path(&self, doc: &dyn Document, element: NodeId) -> String {
        if let Some(id) = doc.id(element) {
            return format!("#{}", css::escape_ident(&id));
        }
        let mut levels: Vec<String> = Vec::new();
        let mut current = Some(element);
        while let Some(node) = current {
            levels.insert(0, Self::level_selector(doc, node));
            let path = levels.join(" > ");
            let unique = doc
                .query_selector_all(&path)
                .is_ok_and(|matches| matches.len() == 1);
            if unique || levels.len() >= self.max_depth {
                return path;
            }
            current = doc.parent_element(node);
        }
        levels.join(" > ")
    }

    /// Absolute XPath with same-tag sibling positions, or an id lookup.
    fn xpath(doc: &dyn Document, element: NodeId) -> String {
        if let Some(id) = doc.id(element) {
            return format!("//*[@id={}]", xpath::literal(&id));
        }
        let mut steps: Vec<String> = Vec::new();
        let mut current = Some(element);
        while let Some(node) = current {
            let tag = doc.tag_name(node).unwrap_or_default();
            let position = doc
                .previous_siblings(node)
                .into_iter()
                .filter(|s| doc.tag_name(*s).as_deref() == Some(tag.as_str()))
                .count()
                + 1;
            if position > 1 {
                steps.push(format!("{tag}[{position}]"));
            } else {
                steps.push(tag);
            }
            current = doc.parent_element(node);
        }
        steps.reverse();
        format!("/{}", steps.join("/"))
    }
}

impl ElementHandler for ButtonHandler {
    fn element_type(&self) -> ElementType {
        ElementType::Button
    }

    fn can_handle(&self, doc: &dyn Document, element: NodeId) -> bool {
        let Some(tag) = doc.tag_name(element) else {
            return false;
        };
        if tag == "button" {
            return true;
        }
        if tag == "input"
            && doc
                .attribute(element, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("button") || t.eq_ignore_ascii_case("submit"))
        {
            return true;
        }
        if doc.attribute(element, "role").as_deref() == Some("button") {
            return true;
        }
        BUTTON_CLASSES.iter().any(|c| doc.has_class(element, c))
    }

    fn trigger(&self, page: &mut dyn Page, element: NodeId) -> Result<(), DomError> {
        page.click(element)
    }

    fn describe(&self, doc: &dyn Document, element: NodeId) -> SelectorDescriptor {
        let css_path = self.css_path(doc, element);
        let index = doc
            .query_selector_all(&css_path)
            .ok()
            .and_then(|matches| matches.iter().position(|m| *m == element));
        SelectorDescriptor {
            xpath: Self::xpath(doc, element),
            text_content: doc.text_content(element).trim().to_string(),
            index,
            css_path,
        }
    }

    fn find_element(
        &self,
        doc: &dyn Document,
        descriptor: &SelectorDescriptor,
    ) -> Option<NodeId> {
        let matches = doc
            .query_selector_all(&descriptor.css_path)
            .unwrap_or_else(|e| {
                debug!(error = %e, "css path unusable, falling back to xpath");
                Vec::new()
            });
        match matches.as_slice() {
            [] => doc.evaluate_xpath(&descriptor.xpath).unwrap_or_else(|e| {
                debug!(error = %e, "xpath unusable");
                None
            }),
            [only] => Some(*only),
            [first, ..] => descriptor
                .index
                .and_then(|i| matches.get(i).copied())
                .or_else(|| {
                    if descriptor.text_content.is_empty() {
                        return None;
                    }
                    matches
                        .iter()
                        .copied()
                        .find(|m| doc.text_content(*m).trim() == descriptor.text_content)
                })
                .or(Some(*first)),
        }
    }
}
