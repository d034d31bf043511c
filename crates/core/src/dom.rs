//! Tree walking and text extraction over a parsed page.
//!
//! The upstream pages carry no ids or classes worth selecting on, so every
//! lookup is a plain tag-name search in document order followed by positional
//! indexing. [`Elements`] is the underlying pre-order traversal.

use scraper::{ElementRef, Node};

use crate::{ModStatsError, Result};

/// Pre-order iterator over an element and all of its descendant elements.
///
/// A node is yielded before its children and children follow sibling order.
/// The traversal is driven by an explicit stack, so it is lazy and a fresh
/// iterator can be created for the same root at any time.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    stack: Vec<ElementRef<'a>>,
}

impl<'a> Elements<'a> {
    pub fn new(root: ElementRef<'a>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(element.children().filter_map(ElementRef::wrap));
        // first child must be popped first
        self.stack[start..].reverse();
        Some(element)
    }
}

/// Collects every element named `tag` under `root` (root included), in
/// document order.
///
/// # Errors
///
/// Returns [`ModStatsError::MissingElement`] when nothing matches. Every
/// caller indexes into the result right away, so an empty success is never
/// handed out.
///
/// # Example
///
/// ```rust
/// use modstats_core::{Document, dom::find_by_tag};
///
/// let doc = Document::parse("<p>a</p><div><p>b</p></div>");
/// let paragraphs = find_by_tag(doc.root(), "p").unwrap();
/// assert_eq!(paragraphs.len(), 2);
/// ```
pub fn find_by_tag<'a>(root: ElementRef<'a>, tag: &str) -> Result<Vec<ElementRef<'a>>> {
    let found: Vec<_> = Elements::new(root).filter(|el| el.value().name() == tag).collect();

    if found.is_empty() {
        return Err(ModStatsError::MissingElement { tag: tag.to_string() });
    }

    Ok(found)
}

/// Concatenates every text node under `element` in document order.
///
/// Element boundaries contribute nothing and whitespace is kept exactly as it
/// appears in the markup; trimming is up to the caller.
pub fn text_content(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    push_text(el, out);
                }
            }
            _ => {}
        }
    }
}

/// Text of the node directly after `element`, whether that node is a bare
/// text node or another element.
///
/// Returns `None` when `element` is the last child of its parent.
pub fn following_text(element: ElementRef<'_>) -> Option<String> {
    let sibling = element.next_sibling()?;

    match sibling.value() {
        Node::Text(text) => Some(text.to_string()),
        _ => ElementRef::wrap(sibling).map(text_content),
    }
}
