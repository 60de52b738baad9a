//! In-memory document
//!
//! A small element tree with just enough behavior to host an animation:
//! `#id`, `.class` and tag selectors, class and attribute bookkeeping, and a
//! width measured as display columns times a fixed character width. Inner
//! markup is stored verbatim, not parsed. Every visible mutation is
//! forwarded to an optional observer and, unless disabled with
//! [`MemoryDocument::with_journal`], appended to a journal. Tests read the
//! journal; the terminal player only observes.

use super::{Document, NodeId};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

/// Default width of one display column, in pixels
const DEFAULT_CHAR_WIDTH: u32 = 8;

/// A recorded document mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Text content replaced
    Text {
        /// Node that changed
        node: NodeId,
        /// New text
        text: String,
    },
    /// Inner markup replaced
    Markup {
        /// Node that changed
        node: NodeId,
        /// New markup
        html: String,
    },
    /// Class added
    ClassAdded {
        /// Node that changed
        node: NodeId,
        /// Class name
        class: String,
    },
    /// Class removed
    ClassRemoved {
        /// Node that changed
        node: NodeId,
        /// Class name
        class: String,
    },
    /// Attribute set
    Attribute {
        /// Node that changed
        node: NodeId,
        /// Attribute name
        name: String,
        /// Attribute value
        value: String,
    },
    /// Stylesheet appended to the head
    Style(String),
}

/// Callback invoked for every recorded mutation
pub type Observer = Arc<dyn Fn(&Mutation) + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Element tree held entirely in memory
pub struct MemoryDocument {
    nodes: Vec<Option<Node>>,
    head: NodeId,
    body: NodeId,
    char_width: u32,
    journal: Vec<Mutation>,
    journaling: bool,
    observer: Option<Observer>,
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.nodes.iter().flatten().count())
            .field("char_width", &self.char_width)
            .field("journal", &self.journal.len())
            .finish()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document with an empty head and body
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            head: 0,
            body: 0,
            char_width: DEFAULT_CHAR_WIDTH,
            journal: Vec::new(),
            journaling: true,
            observer: None,
        };
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc
    }

    /// Set the width of one display column
    #[must_use]
    pub fn with_char_width(mut self, px: u32) -> Self {
        self.char_width = px;
        self
    }

    /// Enable or disable the mutation journal. Observers are notified
    /// either way.
    #[must_use]
    pub fn with_journal(mut self, enabled: bool) -> Self {
        self.journaling = enabled;
        if !enabled {
            self.journal.clear();
        }
        self
    }

    /// Forward every mutation to `observer`
    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    /// The `<head>` element
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `<body>` element
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let node = self.create_element(tag);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Recorded mutations, oldest first
    #[must_use]
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Drain the journal
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Successive text values written to `node`
    #[must_use]
    pub fn text_history(&self, node: NodeId) -> Vec<String> {
        self.journal
            .iter()
            .filter_map(|m| match m {
                Mutation::Text { node: n, text } if *n == node => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Children of a node
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    /// Text of every stylesheet in the head
    #[must_use]
    pub fn styles(&self) -> Vec<String> {
        self.children(self.head)
            .into_iter()
            .filter_map(|id| self.get(id).ok())
            .filter(|n| n.tag == "style")
            .map(|n| n.text.clone())
            .collect()
    }

    fn get(&self, node: NodeId) -> Result<&Node> {
        self.nodes
            .get(node)
            .and_then(Option::as_ref)
            .ok_or(Error::NodeNotFound(node))
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node)
            .and_then(Option::as_mut)
            .ok_or(Error::NodeNotFound(node))
    }

    fn record(&mut self, mutation: Mutation) {
        if let Some(observer) = &self.observer {
            observer(&mutation);
        }
        if self.journaling {
            self.journal.push(mutation);
        }
    }

    fn drop_children(&mut self, node: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(node)?.children);
        for child in children {
            self.free(child);
        }
        Ok(())
    }

    fn free(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.get_mut(node).and_then(Option::take) else {
            return;
        };
        for child in removed.children {
            self.free(child);
        }
    }

    fn matches(node: &Node, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            node.attributes.get("id").is_some_and(|v| v == id)
        } else if let Some(class) = selector.strip_prefix('.') {
            node.classes.iter().any(|c| c == class)
        } else {
            node.tag.eq_ignore_ascii_case(selector)
        }
    }

    fn collect_matches(&self, node: NodeId, selector: &str, out: &mut Vec<NodeId>) {
        let Ok(n) = self.get(node) else {
            return;
        };
        if Self::matches(n, selector) {
            out.push(node);
        }
        for &child in &n.children {
            self.collect_matches(child, selector, out);
        }
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        let Ok(n) = self.get(node) else {
            return;
        };
        out.push('<');
        out.push_str(&n.tag);
        if !n.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", n.classes.join(" ")));
        }
        for (name, value) in &n.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        out.push_str(&n.text);
        for &child in &n.children {
            self.serialize(child, out);
        }
        out.push_str(&format!("</{}>", n.tag));
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Ok(n) = self.get(node) else {
            return;
        };
        out.push_str(&n.text);
        for &child in &n.children {
            self.collect_text(child, out);
        }
    }
}

impl Document for MemoryDocument {
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();
        let mut found = Vec::new();
        if selector.is_empty() {
            return found;
        }
        self.collect_matches(self.head, selector, &mut found);
        self.collect_matches(self.body, selector, &mut found);
        found
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Some(Node {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }));
        self.nodes.len() - 1
    }

    fn node_name(&self, node: NodeId) -> Result<String> {
        Ok(self.get(node)?.tag.clone())
    }

    fn inner_html(&self, node: NodeId) -> Result<String> {
        let n = self.get(node)?;
        let mut out = n.text.clone();
        for &child in &n.children {
            self.serialize(child, &mut out);
        }
        Ok(out)
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.drop_children(node)?;
        self.get_mut(node)?.text = html.to_string();
        self.record(Mutation::Markup {
            node,
            html: html.to_string(),
        });
        Ok(())
    }

    fn text_content(&self, node: NodeId) -> Result<String> {
        self.get(node)?;
        let mut out = String::new();
        self.collect_text(node, &mut out);
        Ok(out)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.drop_children(node)?;
        self.get_mut(node)?.text = text.to_string();
        self.record(Mutation::Text {
            node,
            text: text.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        let old_parent = self.get(child)?.parent;
        if let Some(old_parent) = old_parent {
            if let Ok(p) = self.get_mut(old_parent) {
                p.children.retain(|&c| c != child);
            }
        }
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        let parent = self.get(node)?.parent;
        if let Some(parent) = parent {
            if let Ok(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != node);
            }
        }
        self.free(node);
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let n = self.get_mut(node)?;
        if name == "class" {
            n.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            n.attributes.insert(name.to_string(), value.to_string());
        }
        self.record(Mutation::Attribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.get(node).ok()?;
        if name == "class" {
            return (!n.classes.is_empty()).then(|| n.classes.join(" "));
        }
        n.attributes.get(name).cloned()
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let n = self.get_mut(node)?;
        if n.classes.iter().any(|c| c == class) {
            return Ok(());
        }
        n.classes.push(class.to_string());
        self.record(Mutation::ClassAdded {
            node,
            class: class.to_string(),
        });
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let n = self.get_mut(node)?;
        let before = n.classes.len();
        n.classes.retain(|c| c != class);
        if n.classes.len() != before {
            self.record(Mutation::ClassRemoved {
                node,
                class: class.to_string(),
            });
        }
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn offset_width(&self, node: NodeId) -> Result<u32> {
        let text = self.text_content(node)?;
        Ok(text.width() as u32 * self.char_width)
    }

    fn append_style(&mut self, css: &str) {
        let style = self.create_element("style");
        if let Some(n) = self.nodes.get_mut(style).and_then(Option::as_mut) {
            n.text = css.to_string();
        }
        let head = self.head;
        if self.append_child(head, style).is_ok() {
            self.record(Mutation::Style(css.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn doc_with_title() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let h1 = doc.append_element(body, "h1").unwrap();
        doc.set_attribute(h1, "id", "title").unwrap();
        doc.add_class(h1, "headline").unwrap();
        (doc, h1)
    }

    #[test]
    fn test_selectors() {
        let (mut doc, h1) = doc_with_title();
        assert_eq!(doc.query_selector_all("#title"), vec![h1]);
        assert_eq!(doc.query_selector_all(".headline"), vec![h1]);
        assert_eq!(doc.query_selector_all("H1"), vec![h1]);
        assert!(doc.query_selector_all("#missing").is_empty());
        assert!(doc.query_selector_all("  ").is_empty());

        let body = doc.body();
        let second = doc.append_element(body, "p").unwrap();
        doc.add_class(second, "headline").unwrap();
        assert_eq!(doc.query_selector_all(".headline"), vec![h1, second]);
    }

    #[test]
    fn test_inner_html_round_trip() {
        let (mut doc, h1) = doc_with_title();
        doc.set_inner_html(h1, "Hi <b>there</b>").unwrap();
        let span = doc.create_element("span");
        let markup = doc.inner_html(h1).unwrap();
        doc.set_inner_html(span, &markup).unwrap();
        doc.set_inner_html(h1, "").unwrap();
        doc.append_child(h1, span).unwrap();

        assert_eq!(doc.inner_html(h1).unwrap(), "<span>Hi <b>there</b></span>");
        assert_eq!(doc.children(h1), vec![span]);
    }

    #[test]
    fn test_text_content_replaces_children() {
        let (mut doc, h1) = doc_with_title();
        let child = doc.append_element(h1, "span").unwrap();
        doc.set_text_content(child, "inner").unwrap();
        assert_eq!(doc.text_content(h1).unwrap(), "inner");

        doc.set_text_content(h1, "flat").unwrap();
        assert!(doc.children(h1).is_empty());
        assert!(doc.node_name(child).is_err());
        assert_eq!(doc.text_history(h1), vec!["flat"]);
    }

    #[test]
    fn test_classes_are_idempotent() {
        let (mut doc, h1) = doc_with_title();
        doc.take_journal();
        doc.add_class(h1, "w-cursor").unwrap();
        doc.add_class(h1, "w-cursor").unwrap();
        doc.remove_class(h1, "nope").unwrap();
        doc.remove_class(h1, "w-cursor").unwrap();

        assert_eq!(
            doc.journal(),
            &[
                Mutation::ClassAdded {
                    node: h1,
                    class: "w-cursor".to_string()
                },
                Mutation::ClassRemoved {
                    node: h1,
                    class: "w-cursor".to_string()
                },
            ]
        );
        assert!(!doc.has_class(h1, "w-cursor"));
        assert_eq!(doc.attribute(h1, "class").as_deref(), Some("headline"));
    }

    #[test]
    fn test_offset_width_uses_display_columns() {
        let mut doc = MemoryDocument::new().with_char_width(10);
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.set_text_content(div, "abc").unwrap();
        assert_eq!(doc.offset_width(div).unwrap(), 30);
        doc.set_text_content(div, "日本").unwrap();
        assert_eq!(doc.offset_width(div).unwrap(), 40);
    }

    #[test]
    fn test_remove_detaches() {
        let (mut doc, h1) = doc_with_title();
        let tmp = doc.append_element(h1, "div").unwrap();
        doc.remove(tmp).unwrap();
        assert!(doc.children(h1).is_empty());
        assert!(matches!(doc.remove(tmp), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn test_disabled_journal_still_notifies_observer() {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let mut doc = MemoryDocument::new().with_journal(false);
        doc.set_observer(Arc::new(move |_: &Mutation| {
            *sink.lock().unwrap() += 1;
        }));

        let body = doc.body();
        let p = doc.append_element(body, "p").unwrap();
        for text in ["a", "ab", "abc"] {
            doc.set_text_content(p, text).unwrap();
        }

        assert!(doc.journal().is_empty());
        assert!(doc.text_history(p).is_empty());
        assert_eq!(*seen.lock().unwrap(), 3);
        assert_eq!(doc.text_content(p).unwrap(), "abc");
    }

    #[test]
    fn test_styles_and_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut doc = MemoryDocument::new();
        doc.set_observer(Arc::new(move |m: &Mutation| {
            sink.lock().unwrap().push(m.clone());
        }));

        doc.append_style(".w-cursor::after { content: \"|\"; }");
        assert_eq!(doc.styles().len(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(matches!(seen.lock().unwrap()[0], Mutation::Style(_)));
    }
}
