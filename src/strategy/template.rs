//! Known recipe-plugin markup conventions.
//!
//! Each [`TemplateConvention`] describes how one recipe card plugin marks up
//! its ingredient and instruction lists. Ingredients and steps are chosen
//! independently: the first convention yielding ingredients supplies them,
//! and the first convention yielding steps supplies those, since pages mix
//! one plugin's ingredient markup with another's method markup.

use dom_query::Selection;
use tracing::debug;

use super::structured::{duration_minutes, humanize_duration};
use super::Strategy;
use crate::dom;
use crate::draft::{ExtractionOutcome, RecipeDraft};
use crate::normalize::{clean, dedupe, first_non_empty, first_non_empty_str};
use crate::page::Page;

/// Markup fingerprint of one recipe-card plugin.
#[derive(Debug, Clone, Copy)]
pub struct TemplateConvention {
    /// Plugin name, for logs and tests.
    pub name: &'static str,
    /// Selector matching one element per ingredient.
    pub ingredient_items: &'static str,
    /// Sub-field selectors (amount, unit, name, notes) joined in this order.
    pub ingredient_fields: &'static [&'static str],
    /// Sub-field that must be present for the joined form to be used.
    pub ingredient_name: Option<&'static str>,
    /// Selector matching one element per step.
    pub step_items: &'static str,
    /// Selectors for a servings value.
    pub servings: &'static str,
    /// Selectors for a total time value.
    pub time: &'static str,
}

/// Conventions in priority order.
pub const CATALOG: &[TemplateConvention] = &[
    TemplateConvention {
        name: "wp-recipe-maker",
        ingredient_items: ".wprm-recipe-ingredient, .wprm-recipe-ingredients li",
        ingredient_fields: &[
            ".wprm-recipe-ingredient-amount",
            ".wprm-recipe-ingredient-unit",
            ".wprm-recipe-ingredient-name",
            ".wprm-recipe-ingredient-notes",
        ],
        ingredient_name: Some(".wprm-recipe-ingredient-name"),
        step_items: ".wprm-recipe-instruction-text, .wprm-recipe-instructions li",
        servings: ".wprm-recipe-servings-with-unit, .wprm-recipe-servings",
        time: ".wprm-recipe-total_time-container, .wprm-recipe-total-time-container",
    },
    TemplateConvention {
        name: "tasty-recipes",
        ingredient_items: ".tasty-recipes-ingredients li",
        ingredient_fields: &[],
        ingredient_name: None,
        step_items: ".tasty-recipes-instructions li",
        servings: ".tasty-recipes-yield",
        time: ".tasty-recipes-total-time",
    },
    TemplateConvention {
        name: "mediavine-create",
        ingredient_items: ".mv-create-ingredients li",
        ingredient_fields: &[],
        ingredient_name: None,
        step_items: ".mv-create-instructions li",
        servings: ".mv-create-yield",
        time: ".mv-create-time-total .mv-create-time-format",
    },
    TemplateConvention {
        name: "wpzoom-recipe-card",
        ingredient_items: ".wpzoom-recipe-card .ingredients-list li, .wp-block-wpzoom-recipe-card-block-recipe-card .ingredients-list li",
        ingredient_fields: &[
            ".wpzoom-rcb-ingredient-amount",
            ".wpzoom-rcb-ingredient-unit",
            ".wpzoom-rcb-ingredient-name",
        ],
        ingredient_name: Some(".wpzoom-rcb-ingredient-name"),
        step_items: ".wpzoom-recipe-card .directions-list li, .wp-block-wpzoom-recipe-card-block-recipe-card .directions-list li",
        servings: ".wpzoom-recipe-card .recipe-card-servings .detail-item-value",
        time: ".wpzoom-recipe-card .recipe-card-total-time .detail-item-value",
    },
    TemplateConvention {
        name: "bbc-good-food",
        ingredient_items: ".recipe__ingredients li, .ingredients-list__group li, .ingredients-list__item",
        ingredient_fields: &[],
        ingredient_name: None,
        step_items: ".method__list li, .method__item, .grouped__method .list-item",
        servings: ".recipe__serves, .post-header__servings",
        time: ".recipe__cook-and-prep, .post-header__cook-time",
    },
];

/// Strategy wrapper for [`extract_by_template`].
pub struct TemplateCatalog;

impl Strategy for TemplateCatalog {
    fn name(&self) -> &'static str {
        "template_catalog"
    }

    fn extract(&self, page: &Page, _draft: &RecipeDraft) -> Option<ExtractionOutcome> {
        let outcome = extract_by_template(page);
        if outcome.is_empty() { None } else { Some(outcome) }
    }
}

/// Read ingredients and steps using the first matching plugin conventions,
/// falling back to generic `itemprop` microdata.
#[must_use]
pub fn extract_by_template(page: &Page) -> ExtractionOutcome {
    let ingredients = first_non_empty(
        CATALOG
            .iter()
            .map(|c| {
                let items = read_ingredients(page, c);
                if !items.is_empty() {
                    debug!(convention = c.name, count = items.len(), "template ingredients matched");
                }
                items
            })
            .chain(std::iter::once_with(|| microdata_ingredients(page))),
    );
    let steps = first_non_empty(
        CATALOG
            .iter()
            .map(|c| {
                let items = read_items(&page.select(c.step_items));
                if !items.is_empty() {
                    debug!(convention = c.name, count = items.len(), "template steps matched");
                }
                items
            })
            .chain(std::iter::once_with(|| microdata_steps(page))),
    );

    let servings = first_non_empty_str(
        CATALOG
            .iter()
            .map(|c| c.servings)
            .chain(["[itemprop=\"recipeYield\"]"])
            .map(|sel| first_text(page, sel)),
    );
    let raw_time = first_non_empty_str(
        CATALOG
            .iter()
            .map(|c| c.time)
            .chain(["[itemprop=\"totalTime\"]"])
            .map(|sel| first_text(page, sel)),
    );

    ExtractionOutcome {
        ingredients,
        steps,
        servings,
        total_minutes: raw_time.as_deref().and_then(duration_minutes),
        time: raw_time.and_then(|t| humanize_duration(&t)),
        ..ExtractionOutcome::default()
    }
}

/// Ingredient lines for one convention: joined sub-fields when the item has
/// a non-empty name sub-field, otherwise the item's whole text.
fn read_ingredients(page: &Page, convention: &TemplateConvention) -> Vec<String> {
    let lines = page.select(convention.ingredient_items).iter().map(|item| {
        let has_name = convention
            .ingredient_name
            .is_some_and(|sel| !clean(&item.select(sel).text()).is_empty());
        if !has_name {
            return item_text(&item);
        }

        let fields: Vec<String> = convention
            .ingredient_fields
            .iter()
            .map(|sel| clean(&item.select(sel).text()))
            .filter(|f| !f.is_empty())
            .collect();
        fields.join(" ")
    });
    dedupe(lines)
}

fn read_items(items: &Selection) -> Vec<String> {
    dedupe(items.iter().map(|item| item_text(&item)))
}

/// Text of one list item on a single line.
fn item_text(item: &Selection) -> String {
    clean(&dom::block_text(item)).replace('\n', " ")
}

fn first_text(page: &Page, selector: &str) -> String {
    page.select(selector)
        .iter()
        .map(|el| {
            dom::get_attribute(&el, "content")
                .or_else(|| dom::get_attribute(&el, "datetime"))
                .unwrap_or_else(|| el.text().to_string())
        })
        .map(|t| clean(&t).replace('\n', " "))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn microdata_ingredients(page: &Page) -> Vec<String> {
    read_items(&page.select(r#"[itemprop="recipeIngredient"], [itemprop="ingredients"]"#))
}

/// Steps from `recipeInstructions` microdata. Several holders are read as one
/// step each; a single holder yields its list items, else its paragraphs,
/// else its own lines.
fn microdata_steps(page: &Page) -> Vec<String> {
    let holders = page.select(r#"[itemprop="recipeInstructions"]"#);
    if !holders.exists() {
        return Vec::new();
    }
    if holders.length() > 1 {
        return read_items(&holders);
    }
    let holder = holders.first();

    let items = holder.select("li");
    if items.exists() {
        return read_items(&items);
    }
    let paragraphs = holder.select("p");
    if paragraphs.exists() {
        return read_items(&paragraphs);
    }
    dedupe(dom::text_lines(&holder))
}
