//! # Network Description
//!
//! The TOML file the CLI works from: nodes, cause-effect edges and an
//! optional data section.
//!
//! ```toml
//! [[node]]
//! name = "Cloud"
//! description = "sky is overcast"
//!
//! [[edge]]
//! cause = "Cloud"
//! effect = "Rain"
//!
//! [data]
//! path = "sprinkler.csv"
//! has_probability_column = true
//! ```
//!
//! A relative data path is resolved against the directory of the
//! description file.

use crate::error::{CliError, Result};
use probnet_core::{BayesNetwork, BayesNode, Table, TableLayout};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on a data file read by the CLI (64 MB).
const MAX_DATA_FILE_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    #[serde(default)]
    pub node: Vec<NodeConfig>,
    #[serde(default)]
    pub edge: Vec<EdgeConfig>,
    pub data: Option<DataConfig>,
    /// Directory the description was read from.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeConfig {
    pub cause: String,
    pub effect: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_true")]
    pub has_header: bool,
    #[serde(default)]
    pub has_types: bool,
    #[serde(default)]
    pub has_probability_column: bool,
    #[serde(default = "default_true")]
    pub discrete: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl DataConfig {
    pub fn layout(&self) -> TableLayout {
        TableLayout {
            delimiter: self.delimiter,
            has_header: self.has_header,
            has_types: self.has_types,
            has_probability_column: self.has_probability_column,
        }
    }
}

impl NetworkConfig {
    /// Read and parse a description file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        debug!(
            path = %path.display(),
            nodes = config.node.len(),
            edges = config.edge.len(),
            "network description loaded"
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the untrained network: declared nodes first, then edges.
    /// Edge endpoints that were not declared become nodes.
    pub fn build_network(&self) -> Result<BayesNetwork> {
        let mut net = BayesNetwork::new();
        for node in &self.node {
            net.add_node(BayesNode::new(node.name.as_str()).with_description(&node.description))?;
        }
        for edge in &self.edge {
            net.add_cause_effect(&edge.cause, &edge.effect)?;
        }
        Ok(net)
    }

    /// Read the data section's table.
    pub fn load_table(&self) -> Result<Table> {
        let data = self.data_section()?;
        let path = self.data_path(data);
        let metadata = std::fs::metadata(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.len() > MAX_DATA_FILE_SIZE {
            return Err(CliError::Usage(format!(
                "data file '{}' has {} bytes, at most {} are accepted",
                path.display(),
                metadata.len(),
                MAX_DATA_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Table::parse_delimited(&text, &data.layout())?)
    }

    /// Build the network and train it on the data section.
    pub fn trained_network(&self) -> Result<BayesNetwork> {
        self.train_on(&self.load_table()?)
    }

    /// Build the network and train it on `table` with the data section's
    /// discreteness.
    pub fn train_on(&self, table: &Table) -> Result<BayesNetwork> {
        let data = self.data_section()?;
        let mut net = self.build_network()?;
        net.train_with_table(table, data.discrete)?;
        info!(
            nodes = net.len(),
            rows = table.len(),
            discrete = data.discrete,
            "network trained"
        );
        Ok(net)
    }

    fn data_section(&self) -> Result<&DataConfig> {
        self.data
            .as_ref()
            .ok_or_else(|| CliError::Usage("the description has no [data] section".to_owned()))
    }

    fn data_path(&self, data: &DataConfig) -> PathBuf {
        if data.path.is_absolute() {
            data.path.clone()
        } else {
            self.base_dir.join(&data.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPRINKLER: &str = r#"
[[node]]
name = "Cloud"
description = "sky is overcast"

[[edge]]
cause = "Cloud"
effect = "Rain"

[[edge]]
cause = "Cloud"
effect = "Sprinkler"

[data]
path = "sprinkler.csv"
has_probability_column = true
"#;

    #[test]
    fn parses_with_defaults() {
        let config = NetworkConfig::parse(SPRINKLER).expect("parse");
        assert_eq!(config.node.len(), 1);
        assert_eq!(config.edge.len(), 2);
        let data = config.data.expect("data");
        assert_eq!(data.delimiter, ',');
        assert!(data.has_header);
        assert!(!data.has_types);
        assert!(data.has_probability_column);
        assert!(data.discrete);
    }

    #[test]
    fn builds_declared_and_implied_nodes() {
        let config = NetworkConfig::parse(SPRINKLER).expect("parse");
        let net = config.build_network().expect("network");
        assert_eq!(net.len(), 3);
        assert_eq!(
            net.node("Cloud").expect("cloud").description(),
            "sky is overcast"
        );
        assert_eq!(
            net.children_nodes("Cloud").expect("children"),
            vec!["Rain", "Sprinkler"]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(NetworkConfig::parse("[[node]]\nname = \"A\"\ncolour = \"red\"\n").is_err());
    }

    #[test]
    fn cyclic_description_fails() {
        let config = NetworkConfig::parse(
            "[[edge]]\ncause = \"A\"\neffect = \"B\"\n[[edge]]\ncause = \"B\"\neffect = \"A\"\n",
        )
        .expect("parse");
        assert!(matches!(
            config.build_network(),
            Err(CliError::Core(probnet_core::ProbNetError::Cycle(_)))
        ));
    }

    #[test]
    fn missing_data_section() {
        let config = NetworkConfig::parse("[[node]]\nname = \"A\"\n").expect("parse");
        assert!(matches!(config.load_table(), Err(CliError::Usage(_))));
    }
}
