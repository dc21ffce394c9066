//! Last-resort extraction from the page's linearized text.
//!
//! The body is rendered to lines and split at the first ingredient label and
//! the first method label after it. Noisier than the structural strategies,
//! so it only runs when none of them produced any list.

use tracing::debug;

use super::Strategy;
use crate::dom;
use crate::draft::{ExtractionOutcome, RecipeDraft};
use crate::normalize::{clean, dedupe};
use crate::page::Page;
use crate::patterns::{
    BULLET_PREFIX, INGREDIENTS_LABEL_LINE, JUNK_LINE, MARKDOWN_LINK, STEPS_LABEL_LINE,
    STEP_NUMBER_PREFIX, UNIT_WORD,
};

const MAX_INGREDIENT_CHARS: usize = 140;
const MAX_STEP_CHARS: usize = 600;

/// Below this many measured lines the header filter is not applied.
const MIN_FILTERED_INGREDIENTS: usize = 3;

/// Below this many step lines a sentence re-split is attempted.
const MIN_STEP_LINES: usize = 3;

/// Strategy wrapper for [`extract_from_text`].
pub struct FlatText;

impl Strategy for FlatText {
    fn name(&self) -> &'static str {
        "flat_text"
    }

    fn extract(&self, page: &Page, draft: &RecipeDraft) -> Option<ExtractionOutcome> {
        if !draft.has_no_lists() {
            debug!("structural strategies found lists, skipping flat text");
            return None;
        }
        let outcome = extract_from_text(page);
        if outcome.is_empty() { None } else { Some(outcome) }
    }
}

/// Split the page text at its ingredient and method labels.
#[must_use]
pub fn extract_from_text(page: &Page) -> ExtractionOutcome {
    let lines = linearize(page);

    let ingredients_at = lines.iter().position(|l| INGREDIENTS_LABEL_LINE.is_match(l));
    let search_from = ingredients_at.map_or(0, |i| i + 1);
    let steps_at = lines[search_from..]
        .iter()
        .position(|l| STEPS_LABEL_LINE.is_match(l))
        .map(|i| i + search_from);

    let ingredients = ingredients_at
        .map(|start| {
            let end = steps_at.unwrap_or(lines.len());
            ingredient_lines(&lines[start + 1..end])
        })
        .unwrap_or_default();
    let steps = steps_at
        .map(|start| step_lines(&lines[start + 1..]))
        .unwrap_or_default();

    ExtractionOutcome::lists(ingredients, steps)
}

/// Cleaned, non-empty body lines with markdown links reduced to their text.
fn linearize(page: &Page) -> Vec<String> {
    dom::text_lines(&page.body())
        .iter()
        .map(|line| clean(&MARKDOWN_LINK.replace_all(line, "$1")))
        .filter(|line| !line.is_empty())
        .collect()
}

fn is_label(line: &str) -> bool {
    INGREDIENTS_LABEL_LINE.is_match(line) || STEPS_LABEL_LINE.is_match(line)
}

fn strip_bullet(line: &str) -> String {
    clean(&BULLET_PREFIX.replace(line, ""))
}

fn keep(line: &str, max_chars: usize) -> bool {
    !line.is_empty() && !is_label(line) && !JUNK_LINE.is_match(line) && line.chars().count() <= max_chars
}

fn ingredient_lines(span: &[String]) -> Vec<String> {
    let lines: Vec<String> = span
        .iter()
        .map(|l| strip_bullet(l))
        .filter(|l| keep(l, MAX_INGREDIENT_CHARS))
        .collect();

    let measured: Vec<String> = lines
        .iter()
        .filter(|l| l.chars().any(|c| c.is_ascii_digit()) || UNIT_WORD.is_match(l))
        .cloned()
        .collect();

    if measured.len() >= MIN_FILTERED_INGREDIENTS {
        dedupe(measured)
    } else {
        dedupe(lines)
    }
}

fn step_lines(span: &[String]) -> Vec<String> {
    let strip = |l: &String| clean(&STEP_NUMBER_PREFIX.replace(&strip_bullet(l), ""));

    let lines: Vec<String> = span.iter().map(strip).filter(|l| keep(l, MAX_STEP_CHARS)).collect();

    if lines.len() < MIN_STEP_LINES && lines.iter().any(|l| l.contains(['.', '!', '?'])) {
        let sentences = split_sentences(&lines.join(" "));
        return dedupe(sentences.into_iter().filter(|s| keep(s, MAX_STEP_CHARS)));
    }
    dedupe(lines)
}

/// Split after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            sentences.push(clean(&current));
            current.clear();
        }
    }
    sentences.push(clean(&current));
    sentences.retain(|s| !s.is_empty());
    sentences
}
