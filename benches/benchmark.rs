//! Performance benchmarks for recipe-resolver.
//!
//! Run with: `cargo bench`
//!
//! Each page exercises a different stage of the strategy cascade so the
//! numbers show what an early exit saves.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recipe_resolver::strategy::{default_strategies, FlatText, HeadingSection, Strategy};
use recipe_resolver::{extract_document, extract_with};

const JSON_LD_PAGE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <title>Red lentil soup | Example Kitchen</title>
    <meta name="description" content="A thick red lentil soup.">
    <meta property="og:image" content="/img/soup.jpg">
    <script type="application/ld+json">
    {"@context": "https://schema.org", "@graph": [
        {"@type": "WebSite", "name": "Example Kitchen"},
        {"@type": "Recipe", "name": "Red lentil soup",
         "recipeYield": "4", "totalTime": "PT40M",
         "recipeIngredient": ["200 g red lentils", "1 onion", "2 carrots", "1 l stock"],
         "recipeInstructions": [
            {"@type": "HowToStep", "text": "Fry the onion."},
            {"@type": "HowToStep", "text": "Add carrots and lentils."},
            {"@type": "HowToStep", "text": "Pour in the stock and simmer."}]}
    ]}
    </script>
</head>
<body><article><p>A long story about soup.</p></article></body>
</html>
"#;

const TEMPLATE_PAGE: &str = r#"
<html><body>
<div class="wprm-recipe-container">
    <ul class="wprm-recipe-ingredients">
        <li class="wprm-recipe-ingredient"><span class="wprm-recipe-ingredient-amount">200</span>
            <span class="wprm-recipe-ingredient-unit">g</span>
            <span class="wprm-recipe-ingredient-name">flour</span></li>
        <li class="wprm-recipe-ingredient"><span class="wprm-recipe-ingredient-amount">2</span>
            <span class="wprm-recipe-ingredient-name">eggs</span></li>
    </ul>
    <ul class="wprm-recipe-instructions">
        <li><div class="wprm-recipe-instruction-text">Whisk everything.</div></li>
        <li><div class="wprm-recipe-instruction-text">Fry in butter.</div></li>
    </ul>
</div>
</body></html>
"#;

const HEADING_PAGE: &str = r"
<html><body>
<nav><a href='/'>Home</a><a href='/recipes'>Recipes</a></nav>
<article>
    <h1>Bramborový salát</h1>
    <p>Klasika na Štědrý večer.</p>
    <h3>Suroviny</h3>
    <ul><li>1 kg brambor</li><li>2 mrkve</li><li>3 lžíce majonézy</li></ul>
    <h3>Postup</h3>
    <p>Brambory uvařte ve slupce.</p>
    <p>Nakrájejte a promíchejte.</p>
    <h3>Komentáře</h3>
    <p>Výborné!</p>
</article>
</body></html>
";

const FLAT_TEXT_PAGE: &str = "Title: Lemon drizzle\n\nMarkdown Content:\n\
    **Ingredients**\n\n*   225 g butter\n*   225 g caster sugar\n*   4 eggs\n*   2 lemons\n\n\
    **Method**\n\n1.  Heat the oven.\n2.  Beat the butter and sugar.\n3.  Bake for 45 min.\n";

fn bench_cascade_stages(c: &mut Criterion) {
    let pages = [
        ("structured", JSON_LD_PAGE),
        ("template", TEMPLATE_PAGE),
        ("heading", HEADING_PAGE),
        ("flat_text", FLAT_TEXT_PAGE),
    ];

    let mut group = c.benchmark_group("cascade");
    for (stage, html) in pages {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract_document", stage), html, |b, html| {
            b.iter(|| extract_document(black_box(html), Some("https://example.com/recipes/soup/")));
        });
    }
    group.finish();
}

fn bench_single_strategies(c: &mut Criterion) {
    let heading: Vec<Box<dyn Strategy>> = vec![Box::new(HeadingSection)];
    let flat: Vec<Box<dyn Strategy>> = vec![Box::new(FlatText)];

    c.bench_function("heading_only", |b| {
        b.iter(|| extract_with(&heading, black_box(HEADING_PAGE), None));
    });
    c.bench_function("flat_text_only", |b| {
        b.iter(|| extract_with(&flat, black_box(FLAT_TEXT_PAGE), None));
    });
}

fn bench_cascade_construction(c: &mut Criterion) {
    c.bench_function("default_strategies", |b| {
        b.iter(default_strategies);
    });
}

criterion_group!(benches, bench_cascade_stages, bench_single_strategies, bench_cascade_construction);
criterion_main!(benches);
