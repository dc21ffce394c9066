//! # recipe-resolver
//!
//! Multi-strategy recipe extraction from arbitrary web pages.
//!
//! A page URL is retrieved (directly, through a reader proxy, or as its AMP
//! variant) and run through a cascade of independent extraction strategies:
//! embedded structured data, known recipe-plugin markup, heading-delimited
//! sections and finally the page's flat text. Partial results are merged into
//! one deduplicated, order-preserving recipe record.
//!
//! ## Quick Start
//!
//! ```rust
//! use recipe_resolver::extract_document;
//!
//! let html = r#"<html><head>
//! <script type="application/ld+json">
//! {"@type": "Recipe", "name": "Pancakes",
//!  "recipeIngredient": ["200 g flour", "2 eggs"],
//!  "recipeInstructions": [{"text": "Mix."}, {"text": "Bake."}]}
//! </script></head><body></body></html>"#;
//!
//! let report = extract_document(html, Some("https://example.com/pancakes"));
//! assert_eq!(report.title.as_deref(), Some("Pancakes"));
//! assert_eq!(report.ingredients, vec!["200 g flour", "2 eggs"]);
//! assert_eq!(report.steps, vec!["Mix.", "Bake."]);
//! ```
//!
//! Resolving a live URL needs an async runtime:
//!
//! ```no_run
//! # async fn run() -> recipe_resolver::Result<()> {
//! let recipe = recipe_resolver::resolve("https://example.com/recipes/soup/").await?;
//! println!("{}", serde_json::to_string_pretty(&recipe).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Structured data**: JSON-LD `Recipe` nodes at any depth, including
//!   `@graph` containers and nested instruction sections
//! - **Plugin markup**: WP Recipe Maker, Tasty Recipes, Mediavine Create,
//!   WPZOOM and BBC Good Food conventions plus `itemprop` microdata
//! - **Layout heuristics**: "Ingredients"/"Method" headings (English and
//!   Czech) and a flat-text fallback that also reads reader-proxy markdown
//! - **Retrieval fallbacks**: reader proxy and AMP variants for pages that
//!   block or under-serve direct requests

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Text normalization and deduplication.
pub mod normalize;

/// Parsed-document handle shared by the strategies.
pub mod page;

/// The in-progress recipe accumulator.
pub mod draft;

/// Extraction strategies and the [`strategy::Strategy`] trait.
pub mod strategy;

/// Page-level title/description/image fallback.
pub mod metadata;

/// Keyword-based tag classifier.
pub mod tags;

/// Document retrieval.
pub mod fetch;

/// Variant loop and strategy cascade.
pub mod resolver;

/// Storage collaborator interface.
pub mod store;

/// URL utilities for validation, resolution, and variant derivation.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use draft::{ExtractionOutcome, RecipeDraft};
pub use error::{Error, ErrorPayload, Result};
pub use fetch::{Fetch, Fetched, HttpFetcher, RetrievalMode};
pub use normalize::{clean, dedupe};
pub use options::{Options, DEFAULT_PROXY_PREFIX, DEFAULT_USER_AGENT};
pub use page::Page;
pub use resolver::{extract_document, extract_with, Resolver};
pub use result::{ExtractionReport, Recipe, StrategyReport};
pub use store::{MemoryStore, RecipeStore};
pub use tags::{classify, time_bands};

/// Resolves a recipe URL using default options.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> recipe_resolver::Result<()> {
/// let recipe = recipe_resolver::resolve("https://example.com/recipes/soup/").await?;
/// assert!(!recipe.ingredients.is_empty() || !recipe.steps.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn resolve(url: &str) -> Result<Recipe> {
    resolve_with_options(url, Options::default()).await
}

/// Resolves a recipe URL with custom options.
///
/// # Example
///
/// ```no_run
/// use recipe_resolver::{resolve_with_options, Options};
///
/// # async fn run() -> recipe_resolver::Result<()> {
/// let options = Options { use_proxy: false, ..Options::default() };
/// let recipe = resolve_with_options("https://example.com/recipes/soup/", options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn resolve_with_options(url: &str, options: Options) -> Result<Recipe> {
    Resolver::new(options)?.resolve(url).await
}
