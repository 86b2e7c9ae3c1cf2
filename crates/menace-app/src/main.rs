// `menace` entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays JSON)
// 2. Parse arguments and load config
// 3. Load the four datasets concurrently and build the player index
// 4. Run the command and print its JSON result

use anyhow::Context;
use clap::Parser;
use menace_app::cli::{self, Cli};
use menace_app::config;
use menace_app::loader::DatasetLoader;
use menace_app::refresh::{IndexStore, RefreshOutcome};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse arguments and load config
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    info!(
        "Config loaded: {:?} source at {}",
        config.data.source, config.data.base
    );

    // 3. Load datasets and build the index
    let store = IndexStore::new();
    let loader = DatasetLoader::from_config(&config.data);
    match store.refresh(&loader).await {
        RefreshOutcome::Published { players, .. } => info!("Player index ready: {players} players"),
        other => anyhow::bail!("player index was not published: {other:?}"),
    }
    let index = store.snapshot();
    store.shutdown();

    // 4. Run the command
    let out = cli::execute(&cli.command, &index, &config.search);
    let text = serde_json::to_string_pretty(&out).context("failed to serialize output")?;
    println!("{text}");

    Ok(())
}

/// Initialize tracing to stderr, honoring `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("menace_core=info,menace_app=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
