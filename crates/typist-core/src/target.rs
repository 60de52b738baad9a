//! Target binding and preparation

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::style::{cursor_stylesheet, ANIMATED_CURSOR_CLASS, CURSOR_CLASS};
use tracing::debug;

/// Tag of the element wrapping the animated content
const CONTENT_TAG: &str = "span";

/// Styling of the off-screen measurement node
const PLACEHOLDER_STYLE: &str = "position:absolute; visibility:hidden;";

/// The element an animator is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Element matched by the selector
    pub element: NodeId,
    /// Single child that receives text and cursor classes
    pub content: NodeId,
}

impl Target {
    /// Resolve `selector` to exactly one element
    pub fn resolve(doc: &dyn Document, selector: &str) -> Result<NodeId> {
        if selector.trim().is_empty() {
            return Err(Error::MissingTarget);
        }
        match doc.query_selector_all(selector).as_slice() {
            [] => Err(Error::TargetNotFound(selector.to_string())),
            [element] => Ok(*element),
            found => Err(Error::AmbiguousTarget {
                selector: selector.to_string(),
                count: found.len(),
            }),
        }
    }

    /// Bind the configured target and set it up for animation.
    ///
    /// The element's markup moves into a fresh content child, the width is
    /// pinned to `longest_text` when `fixed_width` is set, the cursor
    /// stylesheet is injected and the initial cursor classes applied.
    pub fn prepare(doc: &mut dyn Document, options: &Options, longest_text: &str) -> Result<Self> {
        let element = Self::resolve(doc, &options.target)?;

        let content = doc.create_element(CONTENT_TAG);
        let markup = doc.inner_html(element)?;
        doc.set_inner_html(content, &markup)?;

        let placeholder = doc.create_element("div");
        doc.set_text_content(placeholder, longest_text)?;
        doc.set_attribute(placeholder, "style", PLACEHOLDER_STYLE)?;
        doc.append_child(content, placeholder)?;

        doc.set_inner_html(element, "")?;
        doc.append_child(element, content)?;

        if options.fixed_width {
            let width = doc.offset_width(placeholder)?;
            debug!(width, "Pinning target width");
            doc.set_attribute(
                element,
                "style",
                &format!("width:{width}px; display: inline-block;"),
            )?;
        }
        doc.remove(placeholder)?;

        doc.append_style(&cursor_stylesheet(&options.blinking_delay));

        if options.cursor || options.animated_cursor {
            doc.add_class(content, CURSOR_CLASS)?;
            if options.animated_cursor {
                doc.add_class(content, ANIMATED_CURSOR_CLASS)?;
            }
        }

        Ok(Self { element, content })
    }
}
