//! Keyword-based recipe tagging.
//!
//! A fixed table maps each tag to one pattern over the lowercased recipe
//! text. Time bands come from the parsed total time, never from the text.
//! Classification is pure: the same input always yields the same set.

#![allow(clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Tag table: (tag, pattern). English and Czech keywords.
const TAG_PATTERNS: &[(&str, &str)] = &[
    // Cuisine
    ("asian", r"soy sauce|sojov|oyster sauce|hoisin|shaoxing|sezam|sesame|\bwok\b|stir-?fr|udon|ramen|gochujang|kimchi|\bmiso\b"),
    ("mexican", r"jalape|chipotle|tortill|salsa|cilantro|enchilad|\btacos?\b"),
    ("italian", r"parmes|parmig|mozzarel|ricotta|bazalk|\bbasil|spaghett|špaget|penne|risott|lasagn|pesto"),
    ("czech", r"česk|slovensk|czech|knedl"),
    ("middle-eastern", r"sumac|tahini|za[’']?atar|pomegranate molasses|aleppo|labneh|\burfa\b|harissa"),
    // Protein
    ("chicken", r"chicken|kuře|kuřec"),
    ("beef", r"\bbeef|hověz"),
    ("pork", r"vepř|\bpork|\bbacon|slanin"),
    ("fish", r"\bryb|salmon|\btuna\b|\bcod\b|losos|treska|\bfish"),
    ("vegetarian", r"\btofu|tempeh|seitan|vegetari|\bvegan"),
    ("legumes", r"lentil|čočk|chickpea|cizrn|fazol|\bbeans?\b"),
    // Dish type
    ("soup", r"polévk|\bsoup|boršč|borsch"),
    ("salad", r"salát|\bsalad"),
    ("dessert", r"dezert|dessert|\bcake|koláč|\bdort"),
    ("noodles", r"noodle|ramen|udon|\bsoba\b|nudl"),
];

/// Time band tags: (tag, inclusive upper bound in minutes).
const TIME_BANDS: &[(&str, u32)] = &[("under-15-min", 15), ("under-30-min", 30)];

static COMPILED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TAG_PATTERNS
        .iter()
        .map(|(tag, pattern)| (*tag, Regex::new(pattern).expect("tag pattern")))
        .collect()
});

/// Tags for a recipe, computed from all of its text fields.
#[must_use]
pub fn classify(title: &str, description: &str, ingredients: &[String], steps: &[String]) -> BTreeSet<String> {
    let blob = [title, description, ingredients.join(" ").as_str(), steps.join(" ").as_str()].join(" ");
    classify_text(&blob)
}

/// Tags matching anywhere in `text` (case-insensitive).
#[must_use]
pub fn classify_text(text: &str) -> BTreeSet<String> {
    let blob = text.to_lowercase();
    COMPILED
        .iter()
        .filter(|(_, pattern)| pattern.is_match(&blob))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}

/// Time band tags for a recipe taking `total_minutes`.
///
/// Bands are upper bounds, so a 10 minute recipe carries both. Unknown
/// durations carry none.
#[must_use]
pub fn time_bands(total_minutes: Option<u32>) -> BTreeSet<String> {
    let Some(minutes) = total_minutes else {
        return BTreeSet::new();
    };
    TIME_BANDS
        .iter()
        .filter(|(_, limit)| minutes <= *limit)
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}
