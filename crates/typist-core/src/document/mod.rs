//! Document - the DOM-like surface an animator draws on
//!
//! The animator needs very little from a document: single-selector lookup,
//! element creation, class/attribute/text mutation, a width measurement for
//! fixed-width layout, and a place to inject a stylesheet. Anything that can
//! provide those (a browser binding, a terminal surface, a test double)
//! implements [`Document`].

mod memory;

pub use memory::{MemoryDocument, Mutation, Observer};

use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle of a node inside a document
pub type NodeId = usize;

/// Document shared between an animator and its commands
pub type SharedDocument = Arc<Mutex<dyn Document>>;

/// Minimal DOM-like document interface
pub trait Document: Send {
    /// All elements matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId>;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Lowercase tag name of an element
    fn node_name(&self, node: NodeId) -> Result<String>;

    /// Serialized inner markup
    fn inner_html(&self, node: NodeId) -> Result<String>;

    /// Replace inner markup, dropping existing children
    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()>;

    /// Concatenated text of the node and its descendants
    fn text_content(&self, node: NodeId) -> Result<String>;

    /// Replace all content with a single text value
    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Detach and drop a node
    fn remove(&mut self, node: NodeId) -> Result<()>;

    /// Set an attribute value
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Read an attribute value
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Add a class (no-op if present)
    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Remove a class (no-op if absent)
    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Whether the node carries `class`
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Rendered width of the node in pixels
    fn offset_width(&self, node: NodeId) -> Result<u32>;

    /// Append a stylesheet to the document head
    fn append_style(&mut self, css: &str);
}

/// Lock a shared document, recovering from a poisoned lock
pub(crate) fn lock(document: &SharedDocument) -> MutexGuard<'_, dyn Document + 'static> {
    document.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_shared_document() {
        let shared: SharedDocument = Arc::new(Mutex::new(MemoryDocument::new()));
        let node = {
            let mut doc = lock(&shared);
            let node = doc.create_element("p");
            doc.set_text_content(node, "hi").unwrap();
            node
        };
        assert_eq!(lock(&shared).text_content(node).unwrap(), "hi");
    }
}
