//! Page-level metadata fallback.
//!
//! Title, description and image read from `<head>` tags and the first `<h1>`,
//! used only for fields the recipe strategies left empty.

use crate::dom;
use crate::normalize::{clean, first_non_empty_str, non_empty};
use crate::page::Page;
use crate::patterns::TITLE_SEPARATOR;

/// Metadata read from one page variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl PageMetadata {
    /// Fill empty fields from `later`, keeping values already present.
    pub fn absorb(&mut self, later: PageMetadata) {
        if self.title.is_none() {
            self.title = later.title;
        }
        if self.description.is_none() {
            self.description = later.description;
        }
        if self.image.is_none() {
            self.image = later.image;
        }
    }
}

/// Read title, description and image from the page's meta tags.
#[must_use]
pub fn extract_page_metadata(page: &Page) -> PageMetadata {
    let title = first_non_empty_str([
        page.meta_content(r#"meta[property="og:title"]"#),
        page.meta_content(r#"meta[name="twitter:title"], meta[property="twitter:title"]"#),
        title_element(page),
        first_h1(page),
    ]
    .into_iter()
    .flatten());

    let description = first_non_empty_str(
        [
            page.meta_content(r#"meta[name="description"]"#),
            page.meta_content(r#"meta[property="og:description"]"#),
            page.meta_content(r#"meta[name="twitter:description"]"#),
        ]
        .into_iter()
        .flatten(),
    );

    let image = first_non_empty_str(
        [
            page.meta_content(r#"meta[property="og:image"]"#),
            page.meta_content(r#"meta[property="og:image:url"]"#),
            page.meta_content(r#"meta[name="twitter:image"], meta[name="twitter:image:src"]"#),
            page.select(r#"link[rel="image_src"]"#)
                .iter()
                .find_map(|link| dom::get_attribute(&link, "href")),
        ]
        .into_iter()
        .flatten(),
    )
    .map(|src| page.absolutize(&src));

    PageMetadata { title, description, image }
}

/// `<title>` text without a trailing site name.
fn title_element(page: &Page) -> Option<String> {
    let title = non_empty(&page.select("title").text())?;
    let main = TITLE_SEPARATOR.split(&title).next().and_then(non_empty);
    main.or(Some(title))
}

fn first_h1(page: &Page) -> Option<String> {
    page.select("h1")
        .iter()
        .find_map(|h1| non_empty(&clean(&dom::block_text(&h1)).replace('\n', " ")))
}
