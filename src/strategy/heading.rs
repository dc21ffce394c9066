//! Section extraction by heading vocabulary.
//!
//! Finds the heading that announces an ingredient or method section and
//! walks the following sibling blocks until the next heading.

use dom_query::Selection;
use regex::Regex;

use super::Strategy;
use crate::dom;
use crate::draft::{ExtractionOutcome, RecipeDraft};
use crate::normalize::{clean, dedupe};
use crate::page::Page;
use crate::patterns::{INGREDIENTS_HEADING, INGREDIENTS_LABEL_LINE, STEPS_HEADING, STEPS_LABEL_LINE};

/// Elements that may act as a section heading.
const HEADING_CANDIDATES: &str = "h1, h2, h3, h4, strong, b";

/// Longer texts are prose that merely mentions the vocabulary.
const MAX_HEADING_CHARS: usize = 60;

/// Limits for the unlabelled sub-section heuristic.
const MAX_SUB_HEADING_CHARS: usize = 40;
const MAX_SUB_ITEM_CHARS: usize = 140;
const MAX_SUB_SECTION_BLOCKS: usize = 10;

/// Strategy wrapper for [`extract_by_heading`].
pub struct HeadingSection;

impl Strategy for HeadingSection {
    fn name(&self) -> &'static str {
        "heading_section"
    }

    fn extract(&self, page: &Page, _draft: &RecipeDraft) -> Option<ExtractionOutcome> {
        let outcome = extract_by_heading(page);
        if outcome.is_empty() { None } else { Some(outcome) }
    }
}

/// Collect ingredients and steps from the sections following matching
/// headings.
#[must_use]
pub fn extract_by_heading(page: &Page) -> ExtractionOutcome {
    let candidates: Vec<Selection> = page.select(HEADING_CANDIDATES).iter().collect();

    let ingredient_heading = candidates.iter().position(|h| is_heading_for(h, &INGREDIENTS_HEADING));
    let steps_heading = candidates.iter().position(|h| is_heading_for(h, &STEPS_HEADING));

    let ingredients = match ingredient_heading {
        Some(i) => collect_section(&candidates[i], usize::MAX),
        None => steps_heading
            .map(|end| collect_sub_sections(&candidates[..end]))
            .unwrap_or_default(),
    };
    let steps = steps_heading
        .map(|i| collect_section(&candidates[i], usize::MAX))
        .unwrap_or_default();

    ExtractionOutcome::lists(ingredients, steps)
}

fn heading_text(heading: &Selection) -> String {
    clean(&heading.text())
}

fn is_heading_for(heading: &Selection, vocabulary: &Regex) -> bool {
    let text = heading_text(heading);
    !text.is_empty() && text.chars().count() <= MAX_HEADING_CHARS && vocabulary.is_match(&text)
}

/// Block whose entire text is a section label, e.g. `<p>Method:</p>`.
fn is_section_label(block: &Selection) -> bool {
    let text = clean(&block.text());
    INGREDIENTS_LABEL_LINE.is_match(&text) || STEPS_LABEL_LINE.is_match(&text)
}

/// Element the sibling walk starts from.
///
/// An inline `strong`/`b` that is the whole text of its parent stands for
/// that parent, so the walk continues after the parent block.
fn walk_origin<'a>(heading: &Selection<'a>) -> Selection<'a> {
    if !dom::is_tag(heading, &["strong", "b"]) {
        return heading.clone();
    }
    match dom::parent_element(heading) {
        Some(parent) if clean(&parent.text()) == heading_text(heading) => parent,
        _ => heading.clone(),
    }
}

/// Items from the sibling blocks after `heading`, up to the next heading or
/// label block, visiting at most `max_blocks` siblings.
fn collect_section(heading: &Selection, max_blocks: usize) -> Vec<String> {
    let mut items = Vec::new();
    let mut next = dom::next_element_sibling(&walk_origin(heading));
    let mut visited = 0;

    while let Some(block) = next {
        if visited >= max_blocks || dom::is_heading(&block) || is_section_label(&block) {
            break;
        }
        collect_block(&block, &mut items);
        visited += 1;
        next = dom::next_element_sibling(&block);
    }
    dedupe(items)
}

fn collect_block(block: &Selection, items: &mut Vec<String>) {
    if dom::is_tag(block, &["ul", "ol"]) {
        items.extend(block.select("li").iter().map(|li| single_line(&li)));
    } else if dom::is_tag(block, &["table"]) {
        items.extend(block.select("tr").iter().map(|row| single_line(&row)));
    } else if dom::is_tag(block, &["p", "div", "section"]) {
        if dom::contains(block, "li") {
            items.extend(block.select("li").iter().map(|li| single_line(&li)));
        } else {
            items.extend(dom::text_lines(block).iter().map(|line| clean(line)));
        }
    }
}

fn single_line(sel: &Selection) -> String {
    clean(&dom::block_text(sel)).replace('\n', " ")
}

/// Ingredient groups under short unlabelled sub-headings ("For the sauce")
/// that precede the method heading.
fn collect_sub_sections(candidates: &[Selection]) -> Vec<String> {
    let items = candidates
        .iter()
        .filter(|h| !dom::is_tag(h, &["h1"]))
        .filter(|h| {
            let text = heading_text(h);
            !text.is_empty()
                && text.chars().count() <= MAX_SUB_HEADING_CHARS
                && !STEPS_HEADING.is_match(&text)
        })
        .flat_map(|h| collect_section(h, MAX_SUB_SECTION_BLOCKS))
        .filter(|item| item.chars().count() <= MAX_SUB_ITEM_CHARS);
    dedupe(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ExtractionOutcome {
        extract_by_heading(&Page::parse(html, None))
    }

    #[test]
    fn heading_pair_with_duplicate_items() {
        let outcome =
            extract("<h2>Ingredients</h2><ul><li>Salt</li><li>Salt</li></ul><h2>Method</h2><p>Stir.</p>");
        assert_eq!(outcome.ingredients, vec!["Salt"]);
        assert_eq!(outcome.steps, vec!["Stir."]);
    }

    #[test]
    fn walk_stops_at_next_heading() {
        let outcome = extract(
            "<h3>Ingredients</h3><ul><li>1 onion</li></ul><p>2 carrots</p>\
             <h3>Notes</h3><ul><li>Keeps for a week</li></ul>",
        );
        assert_eq!(outcome.ingredients, vec!["1 onion", "2 carrots"]);
        assert!(outcome.steps.is_empty());
    }

    #[test]
    fn bold_label_paragraphs() {
        let outcome = extract(
            "<p><strong>Ingredients</strong></p><ul><li>3 eggs</li></ul>\
             <p><strong>Method</strong></p><p>Whisk the eggs.<br>Fry gently.</p>",
        );
        assert_eq!(outcome.ingredients, vec!["3 eggs"]);
        assert_eq!(outcome.steps, vec!["Whisk the eggs.", "Fry gently."]);
    }

    #[test]
    fn table_rows_are_items() {
        let outcome = extract(
            "<h2>Suroviny</h2><table><tr><td>mouka</td><td>200 g</td></tr>\
             <tr><td>mléko</td><td>3 dl</td></tr></table><h2>Postup</h2><ol><li>Smíchejte.</li></ol>",
        );
        assert_eq!(outcome.ingredients, vec!["mouka 200 g", "mléko 3 dl"]);
        assert_eq!(outcome.steps, vec!["Smíchejte."]);
    }

    #[test]
    fn unlabelled_sub_sections_before_method() {
        let outcome = extract(
            "<h1>Bábovka</h1><h3>Na těsto</h3><ul><li>200 g mouky</li><li>2 vejce</li></ul>\
             <h3>Na polevu</h3><p>100 g čokolády</p><h2>Příprava</h2><p>Upečte.</p>",
        );
        assert_eq!(outcome.ingredients, vec!["200 g mouky", "2 vejce", "100 g čokolády"]);
        assert_eq!(outcome.steps, vec!["Upečte."]);
    }

    #[test]
    fn prose_mentioning_ingredients_is_not_a_heading() {
        let outcome = extract(
            "<p><b>We only ever use the freshest ingredients we can find at the local market every week.</b></p>\
             <ul><li>Not an ingredient</li></ul>",
        );
        assert!(outcome.ingredients.is_empty());
    }

    #[test]
    fn no_headings_no_outcome() {
        assert!(HeadingSection
            .extract(&Page::parse("<p>Hello</p>", None), &RecipeDraft::default())
            .is_none());
    }
}
