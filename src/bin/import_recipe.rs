//! Resolve a recipe URL and print the record as JSON.
//!
//! On failure the `{error, status?}` payload is printed instead and the
//! process exits with status 1.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use recipe_resolver::{Options, Resolver, DEFAULT_PROXY_PREFIX};

#[derive(Parser)]
#[command(name = "import_recipe", about = "Extract a recipe from a web page")]
struct Cli {
    /// Page URL
    url: String,

    /// Never use the reader proxy
    #[arg(long)]
    no_proxy: bool,

    /// Never try the /amp/ variant
    #[arg(long)]
    no_amp: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Reader proxy prefix
    #[arg(long, default_value = DEFAULT_PROXY_PREFIX)]
    proxy_prefix: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            use_proxy: !self.no_proxy,
            use_amp: !self.no_amp,
            timeout: Duration::from_secs(self.timeout),
            proxy_prefix: self.proxy_prefix.clone(),
            ..Options::default()
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(json)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = Resolver::new(cli.options())?;

    match resolver.resolve(&cli.url).await {
        Ok(recipe) => {
            println!("{}", to_json(&recipe, cli.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e}");
            println!("{}", to_json(&e.to_payload(), cli.pretty)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
