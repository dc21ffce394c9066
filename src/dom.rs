//! DOM Operations Adapter
//!
//! Small helpers over the `dom_query` crate used by every strategy: tag
//! inspection, sibling walking and block-aware text linearization.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

/// Tags that start a new line when a subtree is linearized.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "tfoot",
    "thead", "tr", "ul",
];

/// Tags whose content is never visible text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "iframe"];

/// Heading tags that terminate a section walk.
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Tag name of a raw node (lowercase), `None` for non-elements.
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Whether the selection's first node is one of `tags`.
#[must_use]
pub fn is_tag(sel: &Selection, tags: &[&str]) -> bool {
    tag_name(sel).is_some_and(|t| tags.contains(&t.as_str()))
}

/// Whether the selection's first node is an `h1`..`h6` element.
#[must_use]
pub fn is_heading(sel: &Selection) -> bool {
    is_tag(sel, HEADING_TAGS)
}

// === Attributes and Text ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

// === Tree Navigation ===

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Get parent element, if the selection has one.
#[must_use]
pub fn parent_element<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes()
        .first()
        .and_then(NodeRef::parent)
        .filter(NodeRef::is_element)
        .map(Selection::from)
}

/// Whether `sel` contains any element matching `selector` (itself excluded).
#[must_use]
pub fn contains(sel: &Selection, selector: &str) -> bool {
    sel.select(selector).exists()
}

// === Linearization ===

/// Render a subtree as text with a line break at every block boundary and
/// `<br>`. Script-like content is skipped. Lines are not cleaned.
#[must_use]
pub fn block_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_node_text(node, &mut out);
    }
    out
}

/// [`block_text`] split into raw lines.
#[must_use]
pub fn text_lines(sel: &Selection) -> Vec<String> {
    block_text(sel).lines().map(str::to_string).collect()
}

fn push_node_text(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        return;
    }

    let tag = node_tag(node);
    let tag = tag.as_deref().unwrap_or("");

    if SKIPPED_TAGS.contains(&tag) {
        return;
    }
    if tag == "br" {
        out.push('\n');
        return;
    }

    let is_block = BLOCK_TAGS.contains(&tag);
    if is_block {
        out.push('\n');
    }
    for child in node.children() {
        push_node_text(&child, out);
    }
    if is_block {
        out.push('\n');
    } else if tag == "td" || tag == "th" {
        out.push(' ');
    }
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
