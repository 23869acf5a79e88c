//! # ProbNet CLI Module
//!
//! ## Available Commands
//!
//! - `train` - Train the network and print every node's a-priori
//! - `query` - Evaluate `P(events | given)`
//! - `independence` - Bayes-Ball relevance of the evidence
//! - `order` - Topological node order
//! - `components` - Weakly connected groups of nodes

mod commands;

use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// ProbNet - Bayesian networks over typed events
///
/// Works from a TOML network description with an optional delimited data
/// file to train on.
#[derive(Parser, Debug)]
#[command(name = "probnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the network description
    #[arg(short, long, global = true, default_value = "probnet.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the network and print a-priori tables
    Train,

    /// Evaluate a conditional probability
    Query {
        /// Query event, e.g. "Rain=heavy" (repeatable)
        #[arg(short, long = "event", required = true)]
        events: Vec<String>,

        /// Evidence, e.g. "Cloud=yes" (repeatable)
        #[arg(short, long)]
        given: Vec<String>,
    },

    /// Show which evidence is irrelevant to a query
    Independence {
        /// Query event (repeatable)
        #[arg(short, long = "event", required = true)]
        events: Vec<String>,

        /// Evidence (repeatable)
        #[arg(short, long)]
        given: Vec<String>,
    },

    /// Print the topological node order
    Order,

    /// Print the weakly connected components
    Components,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Run a parsed command line and return its rendered output.
pub fn execute(cli: &Cli) -> Result<String> {
    let json = cli.json;
    let config = cli.config.as_path();

    match &cli.command {
        Commands::Train => Ok(render(&cmd_train(config)?, train_text, json)),
        Commands::Query { events, given } => {
            Ok(render(&cmd_query(config, events, given)?, query_text, json))
        }
        Commands::Independence { events, given } => Ok(render(
            &cmd_independence(config, events, given)?,
            independence_text,
            json,
        )),
        Commands::Order => Ok(render(&cmd_order(config)?, order_text, json)),
        Commands::Components => Ok(render(&cmd_components(config)?, components_text, json)),
    }
}
