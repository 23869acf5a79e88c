//! # ProbNet
//!
//! The command-line binary over `probnet-core`.
//!
//! ## Usage
//!
//! ```bash
//! # Train and print a-priori tables
//! probnet --config sprinkler.toml train
//!
//! # Conditional probability
//! probnet query --event "Rain=heavy" --given "Cloud=yes"
//!
//! # Evidence relevance
//! probnet independence --event "WetGrass=yes" --given "Cloud=yes" --given "Rain=none"
//! ```

use clap::Parser;
use probnet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // PROBNET_LOG_FORMAT=json enables machine-parseable logs.
    let log_format = std::env::var("PROBNET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "probnet=info,probnet_core=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json {
        println!("ProbNet v{}\n", env!("CARGO_PKG_VERSION"));
    }

    match cli::execute(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
