//! Text normalization shared by every extraction strategy.
//!
//! Nothing enters a draft without passing through [`clean`]; list fields
//! additionally go through [`dedupe`].

use std::collections::HashSet;

/// Characters that render as nothing and are removed outright.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}'];

/// Normalize whitespace in a piece of text.
///
/// Non-breaking and other unicode spaces become plain spaces, runs of
/// horizontal whitespace collapse to one space, every line is trimmed and
/// blank lines are dropped. `clean(clean(x)) == clean(x)` for every input.
///
/// # Example
///
/// ```rust
/// use recipe_resolver::normalize::clean;
///
/// assert_eq!(clean("  200\u{a0}g   flour \n\n\n sifted "), "200 g flour\nsifted");
/// ```
#[must_use]
pub fn clean(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    for line in unified.split('\n') {
        let collapsed = collapse_line(line);
        if collapsed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&collapsed);
    }
    out
}

fn collapse_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for ch in line.chars().filter(|c| !INVISIBLE.contains(c)) {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// Clean every item, drop empty results and later duplicates.
///
/// The first occurrence of each normalized string keeps its position.
#[must_use]
pub fn dedupe<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        let cleaned = clean(item.as_ref());
        if cleaned.is_empty() || seen.contains(&cleaned) {
            continue;
        }
        seen.insert(cleaned.clone());
        out.push(cleaned);
    }
    out
}

/// Clean a single value, mapping an empty result to `None`.
#[must_use]
pub fn non_empty(text: &str) -> Option<String> {
    let cleaned = clean(text);
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// First candidate that is non-empty after cleaning.
#[must_use]
pub fn first_non_empty_str<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find_map(|c| non_empty(c.as_ref()))
}

/// First candidate list that has at least one element.
///
/// Candidates are produced lazily so later sources are never computed once
/// an earlier one succeeded.
#[must_use]
pub fn first_non_empty<T, I>(candidates: I) -> Vec<T>
where
    I: IntoIterator<Item = Vec<T>>,
{
    candidates.into_iter().find(|c| !c.is_empty()).unwrap_or_default()
}
