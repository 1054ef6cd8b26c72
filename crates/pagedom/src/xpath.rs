//! XPath subset for element descriptors.
//!
//! Expressions are absolute location paths: steps separated by `/` (child) or
//! `//` (descendant-or-self, then child). A step is `*` or an element name,
//! followed by any number of predicates: `[n]`, `[@attr]` or
//! `[@attr=literal]`, where the literal may be a quoted string or a
//! `concat(...)` of quoted strings. Predicates apply in order, and positions
//! count per parent, as in XPath 1.0.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{Document, DomError, NodeId, Result};

/// How a step reaches its candidates from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// `/name`
    Child,
    /// `//name`
    Descendant,
}

/// A step filter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    /// `[n]`, 1-based.
    Position(usize),
    /// `[@attr]`
    HasAttr(String),
    /// `[@attr="value"]`
    AttrEquals(String, String),
}

/// One location step.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    /// Axis from the context node.
    axis: Axis,
    /// Lower-cased element name, `None` for `*`.
    name: Option<String>,
    /// Predicates in source order.
    predicates: Vec<Predicate>,
}

impl Step {
    /// Apply the name test and predicates to the element children of `parent`.
    fn select<D: Document + ?Sized>(&self, doc: &D, parent: Option<NodeId>) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = children_of(doc, parent)
            .into_iter()
            .filter(|n| match &self.name {
                None => true,
                Some(name) => doc.tag_name(*n).as_deref() == Some(name.as_str()),
            })
            .collect();
        for pred in &self.predicates {
            nodes = match pred {
                Predicate::Position(n) => n
                    .checked_sub(1)
                    .and_then(|i| nodes.get(i).copied())
                    .into_iter()
                    .collect(),
                Predicate::HasAttr(attr) => nodes
                    .into_iter()
                    .filter(|n| doc.attribute(*n, attr).is_some())
                    .collect(),
                Predicate::AttrEquals(attr, value) => nodes
                    .into_iter()
                    .filter(|n| doc.attribute(*n, attr).as_deref() == Some(value.as_str()))
                    .collect(),
            };
        }
        nodes
    }
}

/// Element children of a context node; `None` is the document node.
fn children_of<D: Document + ?Sized>(doc: &D, node: Option<NodeId>) -> Vec<NodeId> {
    match node {
        None => doc.document_element().into_iter().collect(),
        Some(n) => doc.children(n),
    }
}

/// Descendants of a context node, excluding itself.
fn descendants_of<D: Document + ?Sized>(doc: &D, node: Option<NodeId>) -> Vec<NodeId> {
    let Some(node) = node else {
        return doc.all_elements();
    };
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(node).into_iter().rev().collect();
    while let Some(n) = stack.pop() {
        out.push(n);
        stack.extend(doc.children(n).into_iter().rev());
    }
    out
}

/// A parsed location path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    /// Steps, outermost first.
    steps: Vec<Step>,
}

impl XPath {
    /// Parse an expression.
    pub fn parse(expr: &str) -> Result<Self> {
        Parser::new(expr).parse()
    }

    /// Every selected element, in document order.
    pub fn select_all<D: Document + ?Sized>(&self, doc: &D) -> Vec<NodeId> {
        let order = doc.all_elements();
        let rank: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let mut context: Vec<Option<NodeId>> = vec![None];
        for step in &self.steps {
            let mut seen = HashSet::new();
            let mut next = BTreeSet::new();
            for ctx in &context {
                let mut parents = vec![*ctx];
                if step.axis == Axis::Descendant {
                    parents.extend(descendants_of(doc, *ctx).into_iter().map(Some));
                }
                for parent in parents {
                    if !seen.insert(parent) {
                        continue;
                    }
                    next.extend(
                        step.select(doc, parent)
                            .iter()
                            .filter_map(|n| rank.get(n).copied()),
                    );
                }
            }
            context = next.into_iter().map(|r| Some(order[r])).collect();
            if context.is_empty() {
                break;
            }
        }
        context.into_iter().flatten().collect()
    }

    /// The first selected element in document order.
    pub fn first<D: Document + ?Sized>(&self, doc: &D) -> Option<NodeId> {
        self.select_all(doc).into_iter().next()
    }
}

/// Parse `expr` and return its first match.
pub fn evaluate_first<D: Document + ?Sized>(doc: &D, expr: &str) -> Result<Option<NodeId>> {
    Ok(XPath::parse(expr)?.first(doc))
}

/// Quote `s` as an XPath string literal.
pub fn literal(s: &str) -> String {
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    let parts: Vec<String> = s
        .split('"')
        .map(|p| format!("\"{p}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// Characters allowed in element and attribute names.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':') || !ch.is_ascii()
}

/// Hand-written parser for the supported grammar.
struct Parser<'a> {
    /// Original text, for error messages.
    src: &'a str,
    /// Decoded characters.
    chars: Vec<char>,
    /// Cursor into `chars`.
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Start parsing `src`.
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    /// Build a parse error at the current position.
    fn err(&self, reason: &str) -> DomError {
        DomError::InvalidXPath {
            expr: self.src.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    /// Next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume `ch` if it is next.
    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Require `ch` next.
    fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.err(&format!("expected '{ch}'")))
        }
    }

    /// Skip whitespace.
    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// path := (('/' | '//') step)+
    fn parse(mut self) -> Result<XPath> {
        let mut steps = Vec::new();
        self.skip_ws();
        while self.peek().is_some() {
            if !self.eat('/') {
                return Err(self.err("expected '/'"));
            }
            let axis = if self.eat('/') {
                Axis::Descendant
            } else {
                Axis::Child
            };
            steps.push(self.step(axis)?);
            self.skip_ws();
        }
        if steps.is_empty() {
            return Err(self.err("empty expression"));
        }
        Ok(XPath { steps })
    }

    /// step := ('*' | name) predicate*
    fn step(&mut self, axis: Axis) -> Result<Step> {
        let name = if self.eat('*') {
            None
        } else {
            Some(self.name()?.to_ascii_lowercase())
        };
        let mut predicates = Vec::new();
        while self.eat('[') {
            self.skip_ws();
            predicates.push(self.predicate()?);
            self.skip_ws();
            self.expect(']')?;
        }
        Ok(Step {
            axis,
            name,
            predicates,
        })
    }

    /// The body of a predicate, without brackets.
    fn predicate(&mut self) -> Result<Predicate> {
        if self.eat('@') {
            let attr = self.name()?.to_ascii_lowercase();
            self.skip_ws();
            if !self.eat('=') {
                return Ok(Predicate::HasAttr(attr));
            }
            self.skip_ws();
            let value = self.value()?;
            return Ok(Predicate::AttrEquals(attr, value));
        }
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.err("unsupported predicate"));
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map(Predicate::Position)
            .map_err(|_| self.err("position out of range"))
    }

    /// An element or attribute name.
    fn name(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.err("expected a name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// A string literal or `concat()` of string literals.
    fn value(&mut self) -> Result<String> {
        if !matches!(self.peek(), Some('c')) {
            return self.string();
        }
        let word = self.name()?;
        if word != "concat" {
            return Err(self.err("expected a string literal"));
        }
        self.skip_ws();
        self.expect('(')?;
        let mut out = String::new();
        loop {
            self.skip_ws();
            out.push_str(&self.string()?);
            self.skip_ws();
            if self.eat(')') {
                return Ok(out);
            }
            self.expect(',')?;
        }
    }

    /// A `"..."` or `'...'` literal; XPath 1.0 literals have no escapes.
    fn string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.err("expected a string literal")),
        };
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != quote) {
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.err("unterminated string"));
        }
        let s = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, MemoryDom};

    fn page() -> (MemoryDom, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        dom.append(body, Element::new("div").child(Element::new("button").text("A")));
        let second = dom.append(
            body,
            Element::new("div")
                .child(Element::new("span"))
                .child(Element::new("button").text("B"))
                .child(Element::new("button").id("third").text("C")),
        );
        let b = dom.children(second)[1];
        let c = dom.children(second)[2];
        (dom, b, c)
    }

    #[test]
    fn absolute_paths_with_positions() {
        let (dom, b, _) = page();
        assert_eq!(
            evaluate_first(&dom, "/html/body/div[2]/button").expect("xpath"),
            Some(b)
        );
        assert_eq!(
            evaluate_first(&dom, "/html/body/div[3]").expect("xpath"),
            None
        );
        assert_eq!(evaluate_first(&dom, "/body").expect("xpath"), None);
    }

    #[test]
    fn descendant_with_attribute() {
        let (dom, _, c) = page();
        assert_eq!(
            evaluate_first(&dom, r#"//*[@id="third"]"#).expect("xpath"),
            Some(c)
        );
        assert_eq!(evaluate_first(&dom, "//*[@id]").expect("xpath"), Some(c));
    }

    #[test]
    fn positions_count_per_parent() {
        let (dom, b, _) = page();
        let all = XPath::parse("//button[1]").expect("parse").select_all(&dom);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], b);
        assert!(XPath::parse("//button[2]").expect("parse").first(&dom).is_some());
    }

    #[test]
    fn literals_with_both_quotes() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let id = r#"it's "quoted""#;
        let node = dom.append(body, Element::new("p").id(id));
        let expr = format!("//*[@id={}]", literal(id));
        assert_eq!(evaluate_first(&dom, &expr).expect("xpath"), Some(node));
        assert_eq!(literal("plain"), "\"plain\"");
        assert_eq!(literal("a\"b"), "'a\"b'");
    }

    #[test]
    fn rejects_unsupported_syntax() {
        for bad in ["", "html/body", "//div[last()]", "//div[@id=x]", "/html/", "//a[1"] {
            assert!(
                matches!(XPath::parse(bad), Err(DomError::InvalidXPath { .. })),
                "should reject {bad:?}"
            );
        }
    }
}
