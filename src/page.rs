//! Immutable parsed-document handle passed to every strategy.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;

/// One retrieved document, parsed once and shared read-only by the strategies.
///
/// Strategies only query the document; none of them mutates it.
pub struct Page {
    doc: Document,
    url: Option<Url>,
}

impl Page {
    /// Parse `html` retrieved from `url` (if known).
    #[must_use]
    pub fn parse(html: &str, url: Option<&str>) -> Self {
        Self {
            doc: dom::parse(html),
            url: url.and_then(|u| Url::parse(u).ok()),
        }
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Page URL, used to resolve relative references.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Select all elements matching `selector`.
    #[must_use]
    pub fn select(&self, selector: &str) -> Selection<'_> {
        self.doc.select(selector)
    }

    /// The `<body>` element, or the whole document when there is none.
    #[must_use]
    pub fn body(&self) -> Selection<'_> {
        let body = self.doc.select("body");
        if body.exists() { body.first() } else { self.doc.select("html") }
    }

    /// Value of the `content` attribute of the first matching `<meta>`.
    #[must_use]
    pub fn meta_content(&self, selector: &str) -> Option<String> {
        self.doc
            .select(selector)
            .iter()
            .find_map(|m| dom::get_attribute(&m, "content"))
    }

    /// Resolve `href` against the page URL; returned unchanged when it cannot be.
    #[must_use]
    pub fn absolutize(&self, href: &str) -> String {
        match &self.url {
            Some(base) => crate::url_utils::create_absolute_url(href, base),
            None => href.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_content_reads_first_match() {
        let page = Page::parse(
            r#"<head><meta property="og:title" content="First"><meta property="og:title" content="Second"></head>"#,
            None,
        );
        assert_eq!(page.meta_content(r#"meta[property="og:title"]"#), Some("First".to_string()));
    }

    #[test]
    fn absolutize_uses_page_url() {
        let page = Page::parse("<p>x</p>", Some("https://example.com/recipes/soup/"));
        assert_eq!(page.absolutize("/img/soup.jpg"), "https://example.com/img/soup.jpg");
        assert_eq!(page.absolutize("https://cdn.example.org/a.png"), "https://cdn.example.org/a.png");
    }

    #[test]
    fn body_falls_back_to_html_for_fragments() {
        let page = Page::parse("<p>Hello</p>", None);
        assert!(page.body().text().contains("Hello"));
    }
}
