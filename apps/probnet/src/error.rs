//! # CLI Errors

use probnet_core::ProbNetError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid network description '{path}': {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Core(#[from] ProbNetError),
}

pub type Result<T> = std::result::Result<T, CliError>;
