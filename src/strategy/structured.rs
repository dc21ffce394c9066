//! Schema.org Recipe extraction from JSON-LD blocks.
//!
//! Every `application/ld+json` script is parsed and searched depth-first for
//! the first node typed `Recipe`, following the wrapper keys publishers use
//! to nest it (`@graph`, `mainEntity`, `itemListElement`, ...).

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use super::Strategy;
use crate::dom;
use crate::draft::{ExtractionOutcome, RecipeDraft};
use crate::normalize::{clean, dedupe, non_empty};
use crate::page::Page;
use crate::patterns::DURATION_PART;

/// Keys under which a Recipe node may be nested.
const WRAPPER_KEYS: &[&str] = &[
    "@graph",
    "graph",
    "mainEntity",
    "mainEntityOfPage",
    "itemListElement",
    "item",
];

/// Strategy wrapper for [`extract_structured`].
pub struct StructuredData;

impl Strategy for StructuredData {
    fn name(&self) -> &'static str {
        "structured_data"
    }

    fn extract(&self, page: &Page, _draft: &RecipeDraft) -> Option<ExtractionOutcome> {
        extract_structured(page)
    }
}

/// Extract the first Recipe node found in the page's JSON-LD.
///
/// Returns `None` when no block contains a Recipe-typed node.
#[must_use]
pub fn extract_structured(page: &Page) -> Option<ExtractionOutcome> {
    for script in page.select("script[type]").iter() {
        let is_json_ld = script
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_json_ld {
            continue;
        }

        let raw = dom::text_content(&script);
        for value in parse_json_blocks(&raw) {
            if let Some(node) = find_recipe_node(&value) {
                return Some(map_recipe(node, page));
            }
        }
    }
    None
}

/// Parse one script body into JSON values.
///
/// Pages sometimes concatenate several objects in one block without an
/// enclosing array; when the whole block does not parse, it is split at every
/// `}` `{` boundary and each piece is parsed on its own. Pieces that still
/// fail are skipped.
#[must_use]
pub fn parse_json_blocks(raw: &str) -> Vec<Value> {
    let text = strip_wrappers(raw);
    if text.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => vec![value],
        Err(err) => {
            debug!(error = %err, "JSON-LD block did not parse, trying object split");
            split_concatenated(text)
                .into_iter()
                .filter_map(|part| match serde_json::from_str::<Value>(part) {
                    Ok(v) => Some(v),
                    Err(err) => {
                        debug!(error = %err, "skipping malformed JSON-LD fragment");
                        None
                    }
                })
                .collect()
        }
    }
}

fn strip_wrappers(raw: &str) -> &str {
    let mut text = raw.trim();
    for prefix in ["<!--", "//<![CDATA[", "<![CDATA["] {
        text = text.strip_prefix(prefix).unwrap_or(text).trim();
    }
    for suffix in ["-->", "//]]>", "]]>", ";"] {
        text = text.strip_suffix(suffix).unwrap_or(text).trim();
    }
    text
}

/// Split `{..} {..}` into its objects at closing/opening brace boundaries.
fn split_concatenated(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'}' {
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'{' {
            parts.push(&text[start..=i]);
            start = j;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Depth-first search for the first Recipe-typed object.
///
/// Each node is visited at most once.
#[must_use]
pub fn find_recipe_node(root: &Value) -> Option<&Map<String, Value>> {
    let mut stack: Vec<&Value> = vec![root];
    let mut visited: HashSet<*const Value> = HashSet::new();

    while let Some(node) = stack.pop() {
        if !visited.insert(std::ptr::from_ref(node)) {
            continue;
        }
        match node {
            Value::Array(items) => stack.extend(items.iter().rev()),
            Value::Object(map) => {
                if is_recipe_type(map.get("@type")) {
                    return Some(map);
                }
                for key in WRAPPER_KEYS.iter().rev() {
                    if let Some(child) = map.get(*key) {
                        stack.push(child);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn is_recipe_type(value: Option<&Value>) -> bool {
    fn matches(s: &str) -> bool {
        let local = s.rsplit(['/', ':']).next().unwrap_or(s);
        local.trim().eq_ignore_ascii_case("recipe")
    }

    match value {
        Some(Value::String(s)) => matches(s),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// Recipe instructions as published: a bare string, a list, or a section of
/// nested steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Leaf(String),
    List(Vec<Instruction>),
    Section(Vec<Instruction>),
}

impl Instruction {
    /// Interpret a JSON value; `None` when it carries no instruction text.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Leaf(s.clone())),
            Value::Array(items) => Some(Self::List(items.iter().filter_map(Self::from_value).collect())),
            Value::Object(map) => {
                if let Some(children) = map.get("itemListElement").or_else(|| map.get("steps")) {
                    let steps = match children {
                        Value::Array(items) => items.iter().filter_map(Self::from_value).collect(),
                        other => Self::from_value(other).into_iter().collect(),
                    };
                    return Some(Self::Section(steps));
                }
                ["text", "name", "description"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str).and_then(non_empty))
                    .map(Self::Leaf)
            }
            _ => None,
        }
    }

    /// Leaf texts in document order.
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Self::Leaf(text) => out.extend(text_lines(text)),
            Self::List(items) | Self::Section(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Lines of a JSON string value, with any embedded markup reduced to text.
fn text_lines(raw: &str) -> Vec<String> {
    let text = if raw.contains('<') || raw.contains('&') {
        let doc = dom::parse(raw);
        dom::block_text(&doc.select("body"))
    } else {
        raw.to_string()
    };
    clean(&text).lines().map(str::to_string).collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<&Value> = value.into_iter().collect();
    while let Some(v) = stack.pop() {
        match v {
            Value::String(s) => out.extend(text_lines(s)),
            Value::Array(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
    }
    out
}

fn single_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => non_empty(&text_lines(s).join(" ")),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(|v| match v {
            Value::String(s) => non_empty(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
        _ => None,
    }
}

fn schema_image(map: &Map<String, Value>) -> Option<String> {
    fn image_url(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => non_empty(s),
            Value::Object(obj) => obj
                .get("url")
                .or_else(|| obj.get("contentUrl"))
                .and_then(image_url),
            Value::Array(items) => items.iter().find_map(image_url),
            _ => None,
        }
    }
    map.get("image").and_then(image_url)
}

fn keywords(map: &Map<String, Value>) -> Vec<String> {
    match map.get("keywords") {
        Some(Value::String(s)) => dedupe(s.split(',')),
        Some(Value::Array(items)) => dedupe(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    }
}

/// Components of an ISO-8601 duration as `(value, unit label)`, zero
/// components dropped. `None` when `raw` is not a duration.
fn iso_components(raw: &str) -> Option<Vec<(f64, &'static str)>> {
    let body = raw.strip_prefix(['P', 'p'])?;

    let mut parts = Vec::new();
    let mut number = String::new();
    let mut in_time = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            'T' | 't' => in_time = true,
            unit => {
                let label = match (unit.to_ascii_uppercase(), in_time) {
                    ('Y', false) => "y",
                    ('M', false) => "mo",
                    ('W', false) => "wk",
                    ('D', false) => "d",
                    ('H', true) => "h",
                    ('M', true) => "min",
                    ('S', true) => "s",
                    _ => return None,
                };
                let value: f64 = number.parse().ok()?;
                if value > 0.0 {
                    parts.push((value, label));
                }
                number.clear();
            }
        }
    }

    if number.is_empty() { Some(parts) } else { None }
}

fn minutes_per(label: &str) -> f64 {
    match label {
        "y" => 525_600.0,
        "mo" => 43_200.0,
        "wk" => 10_080.0,
        "d" => 1_440.0,
        "h" => 60.0,
        "s" => 1.0 / 60.0,
        _ => 1.0,
    }
}

/// Render an ISO-8601 duration (`PT1H30M`) as `1 h 30 min`.
///
/// Values that are not durations are returned cleaned; zero durations yield `None`.
#[must_use]
pub fn humanize_duration(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let Some(parts) = iso_components(trimmed) else {
        return non_empty(trimmed);
    };
    if parts.is_empty() {
        return None;
    }

    let shown: Vec<String> = parts
        .iter()
        .map(|(value, label)| {
            if value.fract() == 0.0 {
                format!("{value:.0} {label}")
            } else {
                format!("{value} {label}")
            }
        })
        .collect();
    Some(shown.join(" "))
}

/// Length of a duration in whole minutes.
///
/// Accepts ISO-8601 (`PT1H5M`) and free text such as `1 hr 5 mins` or
/// `45 minut`, where units starting with `h` count as hours and units
/// starting with `m` as minutes. `None` when nothing positive is found.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn duration_minutes(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let total: f64 = match iso_components(trimmed) {
        Some(parts) => parts.iter().map(|(value, label)| value * minutes_per(label)).sum(),
        None => DURATION_PART
            .captures_iter(trimmed)
            .filter_map(|c| {
                let value: f64 = c[1].replace(',', ".").parse().ok()?;
                let unit = c[2].to_lowercase();
                if unit.starts_with('h') {
                    Some(value * 60.0)
                } else if unit.starts_with('m') {
                    Some(value)
                } else {
                    None
                }
            })
            .sum(),
    };

    let minutes = total.round();
    (1.0..=f64::from(u32::MAX)).contains(&minutes).then_some(minutes as u32)
}

/// Total time in minutes: `totalTime`, else prep plus cook time.
fn recipe_minutes(map: &Map<String, Value>) -> Option<u32> {
    let minutes = |key: &str| map.get(key).and_then(Value::as_str).and_then(duration_minutes);

    minutes("totalTime").or_else(|| match (minutes("prepTime"), minutes("cookTime")) {
        (None, None) => None,
        (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
    })
}

fn recipe_time(map: &Map<String, Value>) -> Option<String> {
    let labelled: Vec<String> = [("totalTime", "Total"), ("cookTime", "Cook"), ("prepTime", "Prep")]
        .iter()
        .filter_map(|(key, label)| {
            let raw = map.get(*key)?.as_str()?;
            humanize_duration(raw).map(|t| format!("{label} {t}"))
        })
        .collect();

    if labelled.is_empty() { None } else { Some(labelled.join(", ")) }
}

fn map_recipe(node: &Map<String, Value>, page: &Page) -> ExtractionOutcome {
    let ingredients = dedupe(string_list(
        node.get("recipeIngredient").or_else(|| node.get("ingredients")),
    ));
    let steps = node
        .get("recipeInstructions")
        .and_then(Instruction::from_value)
        .map(|i| dedupe(i.flatten()))
        .unwrap_or_default();

    ExtractionOutcome {
        ingredients,
        steps,
        title: single_string(node, "name").or_else(|| single_string(node, "headline")),
        description: single_string(node, "description"),
        image: schema_image(node).map(|src| page.absolutize(&src)),
        servings: single_string(node, "recipeYield").or_else(|| single_string(node, "yield")),
        time: recipe_time(node),
        total_minutes: recipe_minutes(node),
        keywords: keywords(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(json: &str) -> Page {
        Page::parse(
            &format!(r#"<html><head><script type="application/ld+json">{json}</script></head><body></body></html>"#),
            Some("https://example.com/recipes/cake/"),
        )
    }

    #[test]
    fn test_simple_recipe_schema() {
        let outcome = extract_structured(&page(
            r#"{
                "@context": "https://schema.org",
                "@type": "Recipe",
                "name": "Plain Cake",
                "recipeIngredient": ["200 g flour", "2 eggs"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Mix."}, {"text": "Bake."}]
            }"#,
        ))
        .expect("recipe found");

        assert_eq!(outcome.title.as_deref(), Some("Plain Cake"));
        assert_eq!(outcome.ingredients, vec!["200 g flour", "2 eggs"]);
        assert_eq!(outcome.steps, vec!["Mix.", "Bake."]);
    }

    #[test]
    fn test_graph_container_schema() {
        let outcome = extract_structured(&page(
            r#"{"@graph": [
                {"@type": "WebSite", "name": "Example"},
                {"@type": ["Recipe", "NewsArticle"], "name": "Graph Soup", "recipeIngredient": "1 l water"}
            ]}"#,
        ))
        .expect("recipe found");
        assert_eq!(outcome.title.as_deref(), Some("Graph Soup"));
        assert_eq!(outcome.ingredients, vec!["1 l water"]);
    }

    #[test]
    fn test_main_entity_and_item_list_nesting() {
        let value = json!({
            "@type": "WebPage",
            "mainEntity": {
                "@type": "ItemList",
                "itemListElement": [
                    {"@type": "ListItem", "item": {"@type": "http://schema.org/Recipe", "name": "Deep"}}
                ]
            }
        });
        let node = find_recipe_node(&value).expect("nested recipe");
        assert_eq!(node.get("name"), Some(&json!("Deep")));
    }

    #[test]
    fn test_first_match_depth_first_wins() {
        let value = json!([
            {"@graph": [{"@type": "Recipe", "name": "First"}]},
            {"@type": "Recipe", "name": "Second"}
        ]);
        let node = find_recipe_node(&value).expect("recipe");
        assert_eq!(node.get("name"), Some(&json!("First")));
    }

    #[test]
    fn test_non_wrapper_keys_are_not_followed() {
        let value = json!({"@type": "Article", "review": {"@type": "Recipe", "name": "Hidden"}});
        assert!(find_recipe_node(&value).is_none());
    }

    #[test]
    fn test_invalid_json_skipped() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ invalid json here }</script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Valid"}</script>
        </head></html>"#;
        let outcome = extract_structured(&Page::parse(html, None)).expect("second block parsed");
        assert_eq!(outcome.title.as_deref(), Some("Valid"));
    }

    #[test]
    fn test_concatenated_objects_are_split() {
        let values = parse_json_blocks(r#"{"@type":"WebSite"} {"@type":"Recipe","name":"Split"}"#);
        assert_eq!(values.len(), 2);
        assert!(find_recipe_node(&values[1]).is_some());
    }

    #[test]
    fn test_malformed_piece_does_not_hide_valid_piece() {
        let values = parse_json_blocks(r#"{"broken": } {"@type":"Recipe","name":"Ok"}"#);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_no_recipe_returns_none() {
        assert!(extract_structured(&page(r#"{"@type": "Article", "headline": "News"}"#)).is_none());
        assert!(extract_structured(&Page::parse("<p>nothing</p>", None)).is_none());
    }

    #[test]
    fn test_instruction_sections_flatten_in_order() {
        let value = json!([
            {"@type": "HowToSection", "name": "Dough", "itemListElement": [
                {"@type": "HowToStep", "text": "Knead."},
                {"@type": "HowToStep", "name": "Rest."}
            ]},
            "Shape.",
            {"@type": "HowToSection", "steps": {"description": "Bake."}}
        ]);
        let instruction = Instruction::from_value(&value).expect("instructions");
        assert_eq!(instruction.flatten(), vec!["Knead.", "Rest.", "Shape.", "Bake."]);
    }

    #[test]
    fn test_string_instructions_split_on_lines() {
        let instruction = Instruction::from_value(&json!("Mix it.\n\nBake it.")).expect("leaf");
        assert_eq!(instruction.flatten(), vec!["Mix it.", "Bake it."]);
    }

    #[test]
    fn test_markup_inside_strings_is_reduced_to_text() {
        let instruction = Instruction::from_value(&json!("<p>Whisk <b>well</b>.</p><p>Rest &amp; chill.</p>"))
            .expect("leaf");
        assert_eq!(instruction.flatten(), vec!["Whisk well.", "Rest & chill."]);
    }

    #[test]
    fn test_image_formats() {
        let o = extract_structured(&page(r#"{"@type":"Recipe","image":["/img/a.jpg","/img/b.jpg"]}"#)).expect("recipe");
        assert_eq!(o.image.as_deref(), Some("https://example.com/img/a.jpg"));

        let o = extract_structured(&page(r#"{"@type":"Recipe","image":{"@type":"ImageObject","url":"https://cdn.example.com/c.jpg"}}"#))
            .expect("recipe");
        assert_eq!(o.image.as_deref(), Some("https://cdn.example.com/c.jpg"));
    }

    #[test]
    fn test_yield_time_and_keywords() {
        let o = extract_structured(&page(
            r#"{"@type":"Recipe","recipeYield":[4,"4 servings"],"totalTime":"PT1H30M","prepTime":"PT15M",
                "keywords":"soup, quick , soup"}"#,
        ))
        .expect("recipe");
        assert_eq!(o.servings.as_deref(), Some("4"));
        assert_eq!(o.time.as_deref(), Some("Total 1 h 30 min, Prep 15 min"));
        assert_eq!(o.keywords, vec!["soup", "quick"]);
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(duration_minutes("PT1H30M"), Some(90));
        assert_eq!(duration_minutes("P1DT2H"), Some(1_560));
        assert_eq!(duration_minutes("PT90S"), Some(2));
        assert_eq!(duration_minutes("1 hr 5 mins"), Some(65));
        assert_eq!(duration_minutes("1h30m"), Some(90));
        assert_eq!(duration_minutes("45 minut"), Some(45));
        assert_eq!(duration_minutes("PT0M"), None);
        assert_eq!(duration_minutes("overnight"), None);
    }

    #[test]
    fn test_total_minutes_prefers_total_then_sums_parts() {
        let o = extract_structured(&page(r#"{"@type":"Recipe","totalTime":"PT1H30M","prepTime":"PT15M"}"#))
            .expect("recipe");
        assert_eq!(o.total_minutes, Some(90));

        let o = extract_structured(&page(r#"{"@type":"Recipe","prepTime":"PT10M","cookTime":"PT20M"}"#))
            .expect("recipe");
        assert_eq!(o.total_minutes, Some(30));
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration("PT45M").as_deref(), Some("45 min"));
        assert_eq!(humanize_duration("P1DT2H").as_deref(), Some("1 d 2 h"));
        assert_eq!(humanize_duration("PT0M"), None);
        assert_eq!(humanize_duration("about an hour").as_deref(), Some("about an hour"));
    }
}
