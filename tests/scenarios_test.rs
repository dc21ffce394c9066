use std::collections::HashMap;
use std::sync::Mutex;

use recipe_resolver::strategy::Strategy;
use recipe_resolver::{
    clean, Error, ExtractionOutcome, Fetch, Fetched, Options, Page, RecipeDraft, Resolver, RetrievalMode,
};
use url::Url;

const URL: &str = "https://example.com/recipes/pancakes/";

/// Serves canned responses per retrieval mode and records every call.
#[derive(Default)]
struct ScriptedFetcher {
    responses: HashMap<RetrievalMode, Fetched>,
    calls: Mutex<Vec<RetrievalMode>>,
}

impl ScriptedFetcher {
    fn page(mut self, mode: RetrievalMode, html: &str) -> Self {
        self.responses.insert(mode, Fetched::ok(mode, URL, 200, html));
        self
    }

    fn status(mut self, mode: RetrievalMode, status: u16) -> Self {
        self.responses.insert(mode, Fetched::failed(mode, URL, Some(status), format!("HTTP {status}")));
        self
    }

    fn calls(&self) -> Vec<RetrievalMode> {
        self.calls.lock().expect("lock").clone()
    }
}

impl Fetch for ScriptedFetcher {
    async fn fetch(&self, _target: &Url, mode: RetrievalMode) -> Fetched {
        self.calls.lock().expect("lock").push(mode);
        self.responses
            .get(&mode)
            .cloned()
            .unwrap_or_else(|| Fetched::failed(mode, URL, None, "connection refused"))
    }
}

fn resolver(fetcher: ScriptedFetcher) -> Resolver<ScriptedFetcher> {
    Resolver::with_fetcher(fetcher, Options::default())
}

const JSON_LD_PAGE: &str = r#"<html><head>
<script type="application/ld+json">
{"@context": "https://schema.org", "@type": "Recipe", "name": "Pancakes",
 "recipeIngredient": ["200 g flour", "2 eggs"],
 "recipeInstructions": [{"@type": "HowToStep", "text": "Mix."}, {"@type": "HowToStep", "text": "Bake."}]}
</script></head><body><p>Blog text</p></body></html>"#;

const HEADING_PAGE: &str =
    "<html><body><h2>Ingredients</h2><ul><li>Salt</li><li>Salt</li></ul><h2>Method</h2><p>Stir.</p></body></html>";

#[tokio::test]
async fn scenario_a_structured_data_only() {
    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, JSON_LD_PAGE);
    let recipe = resolver(fetcher).resolve(URL).await.expect("resolved");

    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(recipe.ingredients, vec!["200 g flour", "2 eggs"]);
    assert_eq!(recipe.steps, vec!["Mix.", "Bake."]);
    assert_eq!(recipe.source, URL);
}

#[tokio::test]
async fn scenario_b_template_sub_fields_joined() {
    let html = r#"<html><body><div class="wprm-recipe-container">
        <ul class="wprm-recipe-ingredients"><li class="wprm-recipe-ingredient">
            <span class="wprm-recipe-ingredient-amount">200</span>
            <span class="wprm-recipe-ingredient-unit">g</span>
            <span class="wprm-recipe-ingredient-name">flour</span>
        </li></ul>
        <ul class="wprm-recipe-instructions"><li><div class="wprm-recipe-instruction-text">Mix well.</div></li></ul>
    </div></body></html>"#;
    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, html);
    let recipe = resolver(fetcher).resolve(URL).await.expect("resolved");

    assert_eq!(recipe.ingredients, vec!["200 g flour"]);
    assert_eq!(recipe.steps, vec!["Mix well."]);
}

#[tokio::test]
async fn scenario_c_heading_sections_deduplicated() {
    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, HEADING_PAGE);
    let recipe = resolver(fetcher).resolve(URL).await.expect("resolved");

    assert_eq!(recipe.ingredients, vec!["Salt"]);
    assert_eq!(recipe.steps, vec!["Stir."]);
}

#[tokio::test]
async fn scenario_d_direct_forbidden_proxy_succeeds() {
    let fetcher = ScriptedFetcher::default()
        .status(RetrievalMode::Direct, 403)
        .page(RetrievalMode::Proxied, HEADING_PAGE);
    let resolver = resolver(fetcher);
    let recipe = resolver.resolve(URL).await.expect("proxy variant used");

    assert_eq!(recipe.ingredients, vec!["Salt"]);
    assert_eq!(recipe.steps, vec!["Stir."]);
    assert_eq!(resolver.fetcher().calls(), vec![RetrievalMode::Direct, RetrievalMode::Proxied]);
}

#[tokio::test]
async fn scenario_e_nothing_recognizable_is_no_content() {
    let html = "<html><body><nav><a href='/'>Home</a></nav><p>Nothing to cook here.</p></body></html>";
    let fetcher = ScriptedFetcher::default()
        .page(RetrievalMode::Direct, html)
        .page(RetrievalMode::Proxied, html)
        .page(RetrievalMode::Amp, html);
    let resolver = resolver(fetcher);
    let err = resolver.resolve(URL).await.expect_err("no content");

    assert!(matches!(err, Error::NoContent));
    assert_eq!(err.to_payload().error, "no_content");
    assert_eq!(resolver.fetcher().calls().len(), 3);
}

#[tokio::test]
async fn all_variants_failing_surfaces_last_status() {
    let fetcher = ScriptedFetcher::default()
        .status(RetrievalMode::Direct, 403)
        .status(RetrievalMode::Proxied, 502)
        .status(RetrievalMode::Amp, 404);
    let err = resolver(fetcher).resolve(URL).await.expect_err("fetch failure");

    assert!(matches!(err, Error::Fetch { status: Some(404), .. }));
    assert_eq!(err.to_payload().status, Some(404));
}

#[tokio::test]
async fn structured_success_skips_other_variants() {
    let fetcher = ScriptedFetcher::default()
        .page(RetrievalMode::Direct, JSON_LD_PAGE)
        .page(RetrievalMode::Proxied, HEADING_PAGE);
    let resolver = resolver(fetcher);
    let report = resolver
        .resolve_report(&Url::parse(URL).expect("url"))
        .await
        .expect("report");

    let ran: Vec<&str> = report.strategies.iter().map(|s| s.strategy.as_str()).collect();
    assert_eq!(ran, vec!["structured_data"]);
    assert_eq!(resolver.fetcher().calls(), vec![RetrievalMode::Direct]);
}

#[tokio::test]
async fn partial_result_is_returned_and_later_variants_tried() {
    let partial = "<html><body><h2>Ingredients</h2><ul><li>2 eggs</li></ul></body></html>";
    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, partial);
    let resolver = resolver(fetcher);
    let recipe = resolver.resolve(URL).await.expect("partial result");

    assert_eq!(recipe.ingredients, vec!["2 eggs"]);
    assert!(recipe.steps.is_empty());
    assert_eq!(
        resolver.fetcher().calls(),
        vec![RetrievalMode::Direct, RetrievalMode::Proxied, RetrievalMode::Amp]
    );
}

#[tokio::test]
async fn strictly_better_later_variant_replaces_lists() {
    let partial = "<html><body><h2>Ingredients</h2><ul><li>Share on Facebook</li></ul></body></html>";
    let fetcher = ScriptedFetcher::default()
        .page(RetrievalMode::Direct, partial)
        .page(RetrievalMode::Proxied, HEADING_PAGE);
    let recipe = resolver(fetcher).resolve(URL).await.expect("resolved");

    assert_eq!(recipe.ingredients, vec!["Salt"]);
    assert_eq!(recipe.steps, vec!["Stir."]);
}

#[tokio::test]
async fn disabled_variants_are_not_requested() {
    let fetcher = ScriptedFetcher::default().status(RetrievalMode::Direct, 500);
    let options = Options { use_proxy: false, use_amp: false, ..Options::default() };
    let resolver = Resolver::with_fetcher(fetcher, options);
    let err = resolver.resolve(URL).await.expect_err("fails");

    assert_eq!(err.status(), Some(500));
    assert_eq!(resolver.fetcher().calls(), vec![RetrievalMode::Direct]);
}

#[tokio::test]
async fn amp_target_is_not_retried_as_amp() {
    let fetcher = ScriptedFetcher::default();
    let resolver = resolver(fetcher);
    let _ = resolver.resolve("https://example.com/soup/amp/").await;

    assert_eq!(resolver.fetcher().calls(), vec![RetrievalMode::Direct, RetrievalMode::Proxied]);
}

#[tokio::test]
async fn invalid_url_rejected_before_fetching() {
    let resolver = resolver(ScriptedFetcher::default());
    let err = resolver.resolve("ftp://example.com/x").await.expect_err("invalid");

    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(resolver.fetcher().calls().is_empty());
}

#[tokio::test]
async fn final_lists_have_no_normalized_duplicates() {
    let html = "<html><body><h2>Ingredients</h2><ul><li>1 cup\u{a0}rice</li><li>1 cup rice </li>\
                <li>Salt</li></ul><h2>Method</h2><ol><li>Rinse.</li><li> Rinse.</li><li>Cook.</li></ol></body></html>";
    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, html);
    let recipe = resolver(fetcher).resolve(URL).await.expect("resolved");

    for list in [&recipe.ingredients, &recipe.steps] {
        let mut seen = std::collections::HashSet::new();
        assert!(list.iter().all(|item| seen.insert(clean(item))));
    }
    assert_eq!(recipe.ingredients, vec!["1 cup rice", "Salt"]);
    assert_eq!(recipe.steps, vec!["Rinse.", "Cook."]);
}

/// Records how often it was asked to extract.
struct Counting(std::sync::Arc<Mutex<usize>>);

impl Strategy for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn extract(&self, _page: &Page, _draft: &RecipeDraft) -> Option<ExtractionOutcome> {
        *self.0.lock().expect("lock") += 1;
        None
    }
}

#[tokio::test]
async fn lower_priority_strategy_not_invoked_after_structured_success() {
    let count = std::sync::Arc::new(Mutex::new(0));
    let mut strategies = recipe_resolver::strategy::default_strategies();
    strategies.insert(1, Box::new(Counting(count.clone())));

    let fetcher = ScriptedFetcher::default().page(RetrievalMode::Direct, JSON_LD_PAGE);
    let resolver = resolver(fetcher).with_strategies(strategies);
    resolver.resolve(URL).await.expect("resolved");

    assert_eq!(*count.lock().expect("lock"), 0);
}
