//! attrition-train - Main Entry Point

use attrition_pipeline::cli::{cmd_train, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attrition_pipeline=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    cmd_train(&cli)
}
