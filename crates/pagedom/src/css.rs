//! CSS selector queries and escaping.
//!
//! Queries run through `scraper`: the document is rendered to HTML with every
//! element tagged by its node id, parsed, selected against, and the matches
//! mapped back to [`NodeId`]s in document order. Any `Document` can be queried
//! this way, so hosts that expose element accessors but no query engine get
//! full selector support.

use std::{collections::HashMap, fmt::Write as _};

use scraper::{Html, Selector};
use tracing::trace;

use crate::{Document, DomError, NodeId, Result};

/// Attribute carrying the node id through the HTML rendering.
const NODE_ATTR: &str = "data-pagedom-node";

/// Elements that take no end tag.
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Parse selector text.
pub fn parse(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// All elements of `doc` matching `selector`, in document order.
pub fn query_all<D: Document + ?Sized>(doc: &D, selector: &str) -> Result<Vec<NodeId>> {
    let sel = parse(selector)?;
    let html = Html::parse_document(&render(doc));
    let order: HashMap<NodeId, usize> = doc
        .all_elements()
        .into_iter()
        .enumerate()
        .map(|(i, n)| (n, i))
        .collect();
    let mut found: Vec<(usize, NodeId)> = html
        .select(&sel)
        .filter_map(|el| el.value().attr(NODE_ATTR)?.parse::<u32>().ok())
        .map(NodeId::new)
        .filter_map(|n| order.get(&n).map(|i| (*i, n)))
        .collect();
    found.sort_unstable();
    found.dedup();
    trace!(selector, matches = found.len(), "css query");
    Ok(found.into_iter().map(|(_, n)| n).collect())
}

/// Render the element tree of `doc` as an HTML document, without text.
fn render<D: Document + ?Sized>(doc: &D) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    if let Some(root) = doc.document_element() {
        render_element(doc, root, &mut out);
    }
    out
}

/// Append `node` and its subtree to `out`.
fn render_element<D: Document + ?Sized>(doc: &D, node: NodeId, out: &mut String) {
    let Some(tag) = doc.tag_name(node).filter(|t| is_markup_name(t)) else {
        return;
    };
    let _ignored = write!(out, "<{tag} {NODE_ATTR}=\"{}\"", node.raw());
    for (name, value) in doc.attributes(node) {
        if name == NODE_ATTR || !is_markup_name(&name) {
            continue;
        }
        let _ignored = write!(out, " {name}=\"{}\"", escape_attr_value(&value));
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&tag.as_str()) {
        return;
    }
    for child in doc.children(node) {
        render_element(doc, child, out);
    }
    let _ignored = write!(out, "</{tag}>");
}

/// Tag and attribute names that survive a round trip through the HTML parser.
fn is_markup_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '='))
}

/// Escape an attribute value for a double-quoted HTML attribute.
fn escape_attr_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Characters allowed unescaped inside an identifier.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

/// Append `\<hex> ` for `ch`.
fn push_hex_escape(out: &mut String, ch: char) {
    let _ignored = write!(out, "\\{:x} ", u32::from(ch));
}

/// Escape a string for use as a CSS identifier (`CSS.escape` semantics).
pub fn escape_ident(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars == ['-'] {
        return "\\-".to_string();
    }
    let mut out = String::with_capacity(s.len());
    for (i, &ch) in chars.iter().enumerate() {
        let leading_digit =
            ch.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        if ch == '\0' {
            out.push('\u{FFFD}');
        } else if ch.is_ascii_control() || leading_digit {
            push_hex_escape(&mut out, ch);
        } else if is_name_char(ch) {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

/// Escape a string for use inside a double-quoted CSS string.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push('\u{FFFD}'),
            c if c.is_ascii_control() => push_hex_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out
}
