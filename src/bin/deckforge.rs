//! deckforge -- card search and deck statistics tool server over stdio.
//!
//! Usage: deckforge [--config <path>]

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    // Log to stderr so it does not interfere with the stdio protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args().skip_while(|a| a != "--config").nth(1);

    let engine = match config_path {
        Some(path) => deckforge::EngineConfig::load(std::path::Path::new(&path))
            .with_context(|| format!("failed to load config from {path}"))?,
        None => deckforge::EngineConfig::default(),
    };

    deckforge::run_server(&engine)
}
