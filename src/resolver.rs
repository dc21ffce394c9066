//! Resolution of a URL into a [`Recipe`].
//!
//! The resolver tries the retrieval variants in order (direct, proxied, AMP),
//! runs the strategy cascade on each retrieved document and merges the
//! per-variant drafts. It stops as soon as the merged draft has both
//! ingredients and steps.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};
use url::Url;

use crate::draft::RecipeDraft;
use crate::error::{Error, Result};
use crate::fetch::{Fetch, HttpFetcher, RetrievalMode};
use crate::metadata::{extract_page_metadata, PageMetadata};
use crate::options::Options;
use crate::page::Page;
use crate::result::{ExtractionReport, Recipe, StrategyReport};
use crate::strategy::{default_strategies, Strategy};
use crate::url_utils;

/// Variant label used by [`extract_document`].
const OFFLINE_VARIANT: &str = "offline";

/// Resolves URLs through a [`Fetch`] implementation.
pub struct Resolver<F: Fetch> {
    fetcher: F,
    options: Options,
    strategies: Vec<Box<dyn Strategy>>,
}

impl Resolver<HttpFetcher> {
    /// Resolver over HTTP with the default strategy cascade.
    pub fn new(options: Options) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options)?;
        Ok(Self::with_fetcher(fetcher, options))
    }
}

impl<F: Fetch> Resolver<F> {
    /// Resolver over a custom fetcher with the default strategy cascade.
    pub fn with_fetcher(fetcher: F, options: Options) -> Self {
        Self { fetcher, options, strategies: default_strategies() }
    }

    /// Replace the strategy cascade; strategies run in the given order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn Strategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Retrieval variants allowed by the options, in order.
    fn variants(&self) -> Vec<RetrievalMode> {
        let mut modes = vec![RetrievalMode::Direct];
        if self.options.use_proxy {
            modes.push(RetrievalMode::Proxied);
        }
        if self.options.use_amp {
            modes.push(RetrievalMode::Amp);
        }
        modes
    }

    /// Resolve `url` into a recipe record.
    ///
    /// Fails with [`Error::Fetch`] when no variant could be retrieved and with
    /// [`Error::NoContent`] when documents were retrieved but neither
    /// ingredients nor steps were found. A record with only one of the two
    /// lists is still returned.
    pub async fn resolve(&self, url: &str) -> Result<Recipe> {
        let target = url_utils::parse_target(url)?;
        let report = self.resolve_report(&target).await?;

        if report.is_empty() {
            warn!(url = %target, "no recipe content found");
            return Err(Error::NoContent);
        }

        let recipe = report.into_recipe(target.as_str());
        info!(
            url = %target,
            id = %recipe.id,
            ingredients = recipe.ingredients.len(),
            steps = recipe.steps.len(),
            tags = recipe.tags.len(),
            "resolved recipe"
        );
        Ok(recipe)
    }

    /// Run the variant loop and return the merged report.
    pub async fn resolve_report(&self, target: &Url) -> Result<ExtractionReport> {
        let mut draft = RecipeDraft::default();
        let mut metadata = PageMetadata::default();
        let mut reports = Vec::new();
        let mut retrieved_any = false;
        let mut last_status = None;
        let mut last_error = None;

        for mode in self.variants() {
            if mode == RetrievalMode::Amp && url_utils::amp_url(target).is_none() {
                debug!(url = %target, "target is already an AMP page");
                continue;
            }

            let fetched = self.fetcher.fetch(target, mode).await;
            if !fetched.succeeded {
                last_status = fetched.status.or(last_status);
                last_error = fetched.error;
                continue;
            }
            retrieved_any = true;

            // Reader output keeps the original page's relative references.
            let page_url = if mode == RetrievalMode::Proxied { target.as_str() } else { fetched.url.as_str() };
            let variant = run_cascade(&self.strategies, &fetched.text, Some(page_url), mode.as_str());

            metadata.absorb(variant.metadata);
            reports.extend(variant.reports);
            if draft.absorb(variant.draft) {
                info!(%mode, "later variant replaced incomplete lists");
            }

            if draft.is_complete() {
                debug!(%mode, "draft complete, skipping remaining variants");
                break;
            }
        }

        if !retrieved_any {
            let message = last_error.unwrap_or_else(|| "all retrieval variants failed".to_string());
            warn!(url = %target, status = ?last_status, error = %message, "retrieval failed");
            return Err(Error::Fetch { status: last_status, message });
        }

        Ok(ExtractionReport::assemble(draft, metadata, reports))
    }
}

/// What the cascade produced for one document variant.
struct VariantOutcome {
    draft: RecipeDraft,
    metadata: PageMetadata,
    reports: Vec<StrategyReport>,
}

/// Run `stage` on the current document, treating a panic as `None`.
fn guarded<T>(stage: &str, variant: &str, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(stage, variant, "extraction stage panicked");
            None
        }
    }
}

/// Run `strategies` in order on one document, stopping once the draft is
/// complete. A panicking strategy or metadata pass counts as finding nothing.
fn run_cascade(strategies: &[Box<dyn Strategy>], html: &str, url: Option<&str>, variant: &str) -> VariantOutcome {
    let page = Page::parse(html, url);
    let mut draft = RecipeDraft::default();
    let mut reports = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        let name = strategy.name();
        let (outcome, panicked) = match guarded(name, variant, || strategy.extract(&page, &draft)) {
            Some(outcome) => (outcome, false),
            None => (None, true),
        };

        let before = (draft.ingredients.len(), draft.steps.len());
        if let Some(outcome) = outcome {
            draft.merge(&outcome);
        }
        let ingredients_added = draft.ingredients.len() - before.0;
        let steps_added = draft.steps.len() - before.1;

        debug!(strategy = name, variant, ingredients_added, steps_added, "strategy finished");
        reports.push(StrategyReport {
            strategy: name.to_string(),
            variant: variant.to_string(),
            ingredients_added,
            steps_added,
            panicked,
        });

        if draft.is_complete() {
            break;
        }
    }

    let metadata = guarded("metadata", variant, || extract_page_metadata(&page)).unwrap_or_default();
    VariantOutcome { draft, metadata, reports }
}

/// Run the whole cascade on an already retrieved document.
///
/// `url` resolves relative image references when given.
///
/// # Example
///
/// ```rust
/// use recipe_resolver::extract_document;
///
/// let html = "<h2>Ingredients</h2><ul><li>Salt</li></ul><h2>Method</h2><p>Stir.</p>";
/// let report = extract_document(html, None);
/// assert_eq!(report.ingredients, vec!["Salt"]);
/// assert_eq!(report.steps, vec!["Stir."]);
/// ```
#[must_use]
pub fn extract_document(html: &str, url: Option<&str>) -> ExtractionReport {
    extract_with(&default_strategies(), html, url)
}

/// [`extract_document`] with a custom strategy cascade.
#[must_use]
pub fn extract_with(strategies: &[Box<dyn Strategy>], html: &str, url: Option<&str>) -> ExtractionReport {
    let variant = run_cascade(strategies, html, url, OFFLINE_VARIANT);
    ExtractionReport::assemble(variant.draft, variant.metadata, variant.reports)
}
