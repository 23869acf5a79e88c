//! End-to-end tests of the CLI commands against fixture files.

use clap::Parser;
use probnet::CliError;
use probnet::cli::{
    Cli, cmd_components, cmd_independence, cmd_order, cmd_query, cmd_train, execute,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SPRINKLER_TOML: &str = r#"
[[node]]
name = "Cloud"
description = "sky is overcast"

[[edge]]
cause = "Cloud"
effect = "Rain"

[[edge]]
cause = "Cloud"
effect = "Sprinkler"

[[edge]]
cause = "Rain"
effect = "WetGrass"

[[edge]]
cause = "Sprinkler"
effect = "WetGrass"

[data]
path = "sprinkler.csv"
has_types = true
has_probability_column = true
"#;

const SPRINKLER_CSV: &str = "\
Cloud,Rain,Sprinkler,WetGrass,p
string,string,int,string,float
yes,heavy,3,yes,0.999
yes,light,1,yes,0.4
yes,none,2,no,0.3
no,none,2,yes,0.6
no,none,0,no,0.8
no,light,3,yes,0.2
";

/// Write the fixture files and return the directory with the config path.
fn fixture(toml: &str, csv: Option<&str>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("probnet.toml");
    std::fs::write(&config, toml).expect("write config");
    if let Some(csv) = csv {
        std::fs::write(dir.path().join("sprinkler.csv"), csv).expect("write data");
    }
    (dir, config)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn sprinkler() -> (TempDir, PathBuf) {
    fixture(SPRINKLER_TOML, Some(SPRINKLER_CSV))
}

// =============================================================================
// TRAIN
// =============================================================================

#[test]
fn train_reports_apriori_in_topological_order() {
    let (_dir, config) = sprinkler();
    let report = cmd_train(&config).expect("train");

    assert_eq!(report.rows, 6);
    let names: Vec<&str> = report.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Cloud", "Rain", "Sprinkler", "WetGrass"]);

    let cloud = &report.nodes[0];
    assert_eq!(cloud.description, "sky is overcast");
    assert_eq!(cloud.family, "discrete");
    let yes = cloud
        .apriori
        .iter()
        .find(|(value, _)| value == "yes")
        .map(|(_, p)| *p)
        .expect("yes");
    let total = 0.999 + 0.4 + 0.3 + 0.6 + 0.8 + 0.2;
    assert!((yes - (0.999 + 0.4 + 0.3) / total).abs() < 1e-12);

    for node in &report.nodes {
        let sum: f64 = node.apriori.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9, "{}", node.name);
    }
    assert_eq!(report.nodes[3].parents, vec!["Rain", "Sprinkler"]);
}

#[test]
fn missing_data_file_is_an_io_error() {
    let (_dir, config) = fixture(SPRINKLER_TOML, None);
    assert!(matches!(cmd_train(&config), Err(CliError::Io { .. })));
}

#[test]
fn missing_config_is_an_io_error() {
    let missing = Path::new("/nonexistent/probnet.toml");
    assert!(matches!(cmd_order(missing), Err(CliError::Io { .. })));
}

// =============================================================================
// QUERY
// =============================================================================

#[test]
fn conditional_query() {
    let (_dir, config) = sprinkler();
    let report = cmd_query(&config, &strings(&["Rain=heavy"]), &strings(&["Cloud=yes"]))
        .expect("query");
    assert_eq!(report.query, "P(Rain=heavy | Cloud=yes)");
    assert!((report.probability - 0.999 / (0.999 + 0.4 + 0.3)).abs() < 1e-12);
}

#[test]
fn integer_values_follow_the_node_range() {
    let (_dir, config) = sprinkler();
    let report = cmd_query(&config, &strings(&["Sprinkler=2"]), &[]).expect("query");
    assert!(report.probability > 0.0 && report.probability < 1.0);
}

#[test]
fn query_on_unknown_node_is_a_usage_error() {
    let (_dir, config) = sprinkler();
    let result = cmd_query(&config, &strings(&["Snow=yes"]), &[]);
    assert!(matches!(result, Err(CliError::Usage(_))));
}

#[test]
fn expression_without_operator_is_a_usage_error() {
    let (_dir, config) = sprinkler();
    let result = cmd_query(&config, &strings(&["Rain"]), &[]);
    assert!(matches!(result, Err(CliError::Usage(_))));
}

// =============================================================================
// INDEPENDENCE / ORDER / COMPONENTS
// =============================================================================

#[test]
fn independence_drops_screened_off_evidence() {
    let (_dir, config) = fixture(SPRINKLER_TOML.split("[data]").next().unwrap_or(""), None);
    let report = cmd_independence(
        &config,
        &strings(&["WetGrass=yes"]),
        &strings(&["Cloud=yes", "Rain=none", "Sprinkler=2"]),
    )
    .expect("independence");
    assert_eq!(report.irrelevant, vec!["Cloud"]);
    assert_eq!(report.dropped_evidence, vec!["Cloud"]);
    assert_eq!(report.reduced, "P(WetGrass=yes | Rain=none, Sprinkler=2)");
}

#[test]
fn order_is_topological() {
    let (_dir, config) = sprinkler();
    let report = cmd_order(&config).expect("order");
    assert_eq!(report.order, vec!["Cloud", "Rain", "Sprinkler", "WetGrass"]);
}

#[test]
fn components_follow_declaration_order() {
    let toml = r#"
[[node]]
name = "E"

[[edge]]
cause = "A"
effect = "B"

[[edge]]
cause = "C"
effect = "D"
"#;
    let (_dir, config) = fixture(toml, None);
    let report = cmd_components(&config).expect("components");
    assert_eq!(
        report.components,
        vec![strings(&["E"]), strings(&["A", "B"]), strings(&["C", "D"])]
    );
}

// =============================================================================
// COMMAND LINE
// =============================================================================

#[test]
fn json_output_parses() {
    let (_dir, config) = sprinkler();
    let config = config.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from([
        "probnet",
        "--config",
        config.as_str(),
        "--json",
        "query",
        "--event",
        "Cloud=yes",
    ])
    .expect("args");
    let output = execute(&cli).expect("execute");
    let value: serde_json::Value = serde_json::from_str(&output).expect("json");
    assert_eq!(value["query"], "P(Cloud=yes)");
    assert!(value["probability"].as_f64().is_some_and(|p| p > 0.5));
}

#[test]
fn query_requires_an_event() {
    assert!(Cli::try_parse_from(["probnet", "query", "--given", "Cloud=yes"]).is_err());
}
