//! # probnet
//!
//! Command-line front end for `probnet-core`: loads a network description,
//! trains it on delimited data and answers queries.

pub mod cli;
pub mod config;
pub mod error;

pub use error::{CliError, Result};
