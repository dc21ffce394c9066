//! Simple CLI that reads HTML from stdin and outputs the extraction report
//! as JSON to stdout. Nothing is fetched.

use std::io::{self, Read};

use clap::Parser;
use recipe_resolver::extract_document;

#[derive(Parser)]
#[command(name = "extract_stdin", about = "Run the recipe cascade on HTML from stdin")]
struct Cli {
    /// URL the HTML was retrieved from, for resolving relative links
    #[arg(long)]
    url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut html = String::new();
    io::stdin().read_to_string(&mut html)?;

    let report = extract_document(&html, cli.url.as_deref());
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
