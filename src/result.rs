//! Result types for recipe resolution.
//!
//! [`ExtractionReport`] is what the strategy cascade produced for one or more
//! document variants; [`Recipe`] is the canonical record handed to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::RecipeDraft;
use crate::metadata::PageMetadata;
use crate::tags;

/// The canonical recipe record.
///
/// Serializes to `{id, title, description, image, ingredients, steps,
/// servings?, time?, tags, source}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Opaque identifier, unique per resolution.
    pub id: String,

    /// Recipe title; empty when no source supplied one.
    pub title: String,

    /// Short description; may be empty.
    pub description: String,

    /// Absolute image URL; may be empty.
    pub image: String,

    /// Ingredient lines in first-appearance order, deduplicated.
    pub ingredients: Vec<String>,

    /// Method steps in first-appearance order, deduplicated.
    pub steps: Vec<String>,

    /// Yield, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,

    /// Timing, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Classifier tags, sorted.
    #[serde(default)]
    pub tags: Vec<String>,

    /// The URL the recipe was resolved from.
    pub source: String,
}

/// What one strategy contributed to the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReport {
    /// Strategy identifier.
    pub strategy: String,

    /// Retrieval mode of the variant the strategy ran on (`direct`, `proxied`,
    /// `amp`, or `offline`).
    pub variant: String,

    /// Newly added ingredient lines.
    pub ingredients_added: usize,

    /// Newly added steps.
    pub steps_added: usize,

    /// The strategy panicked and was treated as finding nothing.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub panicked: bool,
}

/// Everything the cascade extracted, before an id and source are attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub servings: Option<String>,
    pub time: Option<String>,
    pub total_minutes: Option<u32>,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,

    /// Strategy invocations in the order they ran.
    pub strategies: Vec<StrategyReport>,
}

impl ExtractionReport {
    /// Assemble the final fields from the merged draft and page metadata.
    ///
    /// Draft values (from the recipe strategies) take precedence; metadata
    /// only fills what the draft left empty. Tags are computed here from the
    /// final text fields and keywords, plus time bands from the parsed total.
    #[must_use]
    pub fn assemble(draft: RecipeDraft, metadata: PageMetadata, strategies: Vec<StrategyReport>) -> Self {
        let title = draft.title.or(metadata.title);
        let description = draft.description.or(metadata.description);
        let image = draft.image.or(metadata.image);
        let ingredients = draft.ingredients.into_vec();
        let steps = draft.steps.into_vec();
        let keywords = draft.keywords.into_vec();

        let mut labels = tags::classify(
            title.as_deref().unwrap_or_default(),
            description.as_deref().unwrap_or_default(),
            &ingredients,
            &steps,
        );
        labels.extend(tags::classify_text(&keywords.join(" ")));
        labels.extend(tags::time_bands(draft.total_minutes));
        let tags = labels.into_iter().collect();

        Self {
            title,
            description,
            image,
            ingredients,
            steps,
            servings: draft.servings,
            time: draft.time,
            total_minutes: draft.total_minutes,
            keywords,
            tags,
            strategies,
        }
    }

    /// Neither ingredients nor steps were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.steps.is_empty()
    }

    /// Both ingredients and steps were found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.ingredients.is_empty() && !self.steps.is_empty()
    }

    /// Turn the report into a record with a fresh id.
    #[must_use]
    pub fn into_recipe(self, source: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4().to_string(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            ingredients: self.ingredients,
            steps: self.steps,
            servings: self.servings,
            time: self.time,
            tags: self.tags,
            source: source.to_string(),
        }
    }
}
