//! Compiled regex patterns shared by the extraction strategies.
//!
//! All patterns are compiled once at first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Section Vocabulary
// =============================================================================

/// Heading text announcing an ingredient section (English and Czech).
pub static INGREDIENTS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ingredients?|ingredience|suroviny)\b").expect("INGREDIENTS_HEADING regex")
});

/// Heading text announcing a method section (English and Czech).
pub static STEPS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(method|instructions?|directions|preparation|postup|příprava|kroky)\b")
        .expect("STEPS_HEADING regex")
});

/// A whole line that is only an ingredient label, optionally decorated with
/// markdown heading/emphasis markers and a trailing colon.
pub static INGREDIENTS_LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[#*_\s]*(ingredients?|ingredience|suroviny)[*_\s]*:?[*_\s]*$")
        .expect("INGREDIENTS_LABEL_LINE regex")
});

/// A whole line that is only a method label.
pub static STEPS_LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[#*_\s]*(method|instructions?|directions|preparation|postup|příprava|kroky)[*_\s]*:?[*_\s]*$",
    )
    .expect("STEPS_LABEL_LINE regex")
});

// =============================================================================
// Line Heuristics
// =============================================================================

/// Measurement words that mark a line as an ingredient rather than a header.
pub static UNIT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(g|kg|mg|ml|l|dl|cl|oz|lb|lbs|cups?|tbsp|tsp|tablespoons?|teaspoons?|pinch|handful|cloves?|slices?|cans?|ks|lžičk[ay]|lžic[eí]|hrst[i]?|špetk[ay]|stroužk[ůy]?|plátk[ůy]?|balíčk(?:ek|y))\b",
    )
    .expect("UNIT_WORD regex")
});

/// Leading bullet characters and markdown list markers.
pub static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+•·▢□◦▪]\s+|[•·▢□◦▪])").expect("BULLET_PREFIX regex")
});

/// Leading step numbering such as `1.`, `2)` or `Step 3:`.
pub static STEP_NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:step\s*)?\d{1,2}\s*[.):]\s+").expect("STEP_NUMBER_PREFIX regex")
});

/// Promotional and navigation noise that never belongs in a recipe.
pub static JUNK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(newsletter|subscribe|sign up|cookie|advertisement|jump to recipe|print recipe|pin (it|this)|kuchařk|sleva|do obchodu|sledujte|kupte|novinky)",
    )
    .expect("JUNK_LINE regex")
});

/// Markdown image or link syntax emitted by the reader proxy.
pub static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("MARKDOWN_LINK regex")
});

/// A number followed by a unit word, as in `1 hr 5 mins` or `45 minut`.
pub static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(\p{L}+)").expect("DURATION_PART regex")
});

// =============================================================================
// Page Metadata
// =============================================================================

/// Separator between a page title and its site-name suffix.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[|–—·»]\s+|\s+-\s+").expect("TITLE_SEPARATOR regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_vocabulary_matches_localized_labels() {
        assert!(INGREDIENTS_HEADING.is_match("Suroviny"));
        assert!(INGREDIENTS_HEADING.is_match("Ingredients for 4"));
        assert!(STEPS_HEADING.is_match("Postup"));
        assert!(STEPS_HEADING.is_match("Method"));
        assert!(!STEPS_HEADING.is_match("Methodology"));
    }

    #[test]
    fn label_lines_tolerate_markdown() {
        assert!(INGREDIENTS_LABEL_LINE.is_match("## Ingredients"));
        assert!(INGREDIENTS_LABEL_LINE.is_match("**Ingredients:**"));
        assert!(!INGREDIENTS_LABEL_LINE.is_match("Ingredients are listed below"));
        assert!(STEPS_LABEL_LINE.is_match("Instructions:"));
    }

    #[test]
    fn prefixes_are_recognized() {
        assert!(BULLET_PREFIX.is_match("- 2 eggs"));
        assert!(BULLET_PREFIX.is_match("▢ 200 g flour"));
        assert!(STEP_NUMBER_PREFIX.is_match("1. Mix"));
        assert!(STEP_NUMBER_PREFIX.is_match("Step 2: Bake"));
        assert!(!STEP_NUMBER_PREFIX.is_match("200 g flour"));
    }

    #[test]
    fn unit_words_match_whole_words() {
        assert!(UNIT_WORD.is_match("salt, a pinch"));
        assert!(UNIT_WORD.is_match("2 lžičky cukru"));
        assert!(!UNIT_WORD.is_match("For the glaze"));
    }

    #[test]
    fn title_separator_splits_site_suffix() {
        let parts: Vec<&str> = TITLE_SEPARATOR.split("Tomato soup | Kitchen Blog").collect();
        assert_eq!(parts, vec!["Tomato soup", "Kitchen Blog"]);
        assert_eq!(TITLE_SEPARATOR.split("Stir-fry noodles").count(), 1);
    }
}
