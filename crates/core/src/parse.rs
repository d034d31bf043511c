//! HTML document wrapper.
//!
//! This module provides the [`Document`] type, a parsed upstream page that the
//! tree walker and the table mapper operate on.
//!
//! # Example
//!
//! ```rust
//! use modstats_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <table><tr><th>Rank</th></tr><tr><td>1</td></tr></table>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let tbody = doc.table(0).unwrap();
//! assert_eq!(tbody.value().name(), "tbody");
//! ```

use scraper::{ElementRef, Html};

use crate::dom::find_by_tag;
use crate::{ModStatsError, Result};

/// Represents a parsed HTML page.
///
/// The parse tree lives as long as the `Document`; every node handed out by
/// [`Document::find_by_tag`] or [`Document::table`] borrows from it.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Parsing never fails: malformed markup is repaired the way browsers do
    /// it, which also means stray `<tr>`/`<td>` tags outside a `<table>` are
    /// dropped and a `<tbody>` is inserted into tables that lack one.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Gets the `<html>` root element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Finds every element named `tag` in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ModStatsError::MissingElement`] if the page has none.
    pub fn find_by_tag(&self, tag: &str) -> Result<Vec<ElementRef<'_>>> {
        find_by_tag(self.root(), tag)
    }

    /// Gets the `index`-th `<tbody>` of the page.
    ///
    /// # Errors
    ///
    /// Returns [`ModStatsError::MissingElement`] when the page has no table at
    /// all and [`ModStatsError::MissingTable`] when it has fewer than
    /// `index + 1`.
    pub fn table(&self, index: usize) -> Result<ElementRef<'_>> {
        let bodies = self.find_by_tag("tbody")?;
        bodies
            .get(index)
            .copied()
            .ok_or_else(|| ModStatsError::MissingTable { index, found: bodies.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text_content;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title>Mod Browser</title></head>
        <body>
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <table><tr><th>B</th></tr><tr><td>2</td></tr></table>
        </body>
        </html>
    "#;

    #[test]
    fn test_root_is_html() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.root().value().name(), "html");
    }

    #[test]
    fn test_table_by_index() {
        let doc = Document::parse(SAMPLE_HTML);
        let second = doc.table(1).unwrap();

        assert!(text_content(second).contains('B'));
    }

    #[test]
    fn test_table_out_of_range() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.table(3);

        assert!(matches!(result, Err(ModStatsError::MissingTable { index: 3, found: 2 })));
    }

    #[test]
    fn test_page_without_tables() {
        let doc = Document::parse("<html><body><p>maintenance</p></body></html>");

        assert!(matches!(doc.table(0), Err(ModStatsError::MissingElement { .. })));
    }
}
