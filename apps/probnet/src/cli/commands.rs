//! # CLI Command Implementations
//!
//! Each command builds a serializable report; `print` renders it as text
//! or JSON.

use crate::config::NetworkConfig;
use crate::error::{CliError, Result};
use probnet_core::variant::MatchOp;
use probnet_core::{BayesNetwork, ConditionalEvent, Event, EventCatenation, ScalarKind, Tag};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

// =============================================================================
// REPORTS
// =============================================================================

/// A-priori marginal of one node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub description: String,
    pub family: String,
    pub range: String,
    pub parents: Vec<String>,
    /// `(value, probability)` pairs; empty when the marginal was not
    /// propagated.
    pub apriori: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub rows: usize,
    pub nodes: Vec<NodeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub query: String,
    pub reduced: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndependenceReport {
    pub query: String,
    pub reduced: String,
    pub irrelevant: Vec<String>,
    pub dropped_evidence: Vec<String>,
    pub requisite: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderReport {
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentsReport {
    pub components: Vec<Vec<String>>,
}

/// Render a report: pretty JSON, or the text form.
pub fn render<T: Serialize>(report: &T, text: impl FnOnce(&T) -> String, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(report).unwrap_or_default()
    } else {
        text(report)
    }
}

// =============================================================================
// EXPRESSION PARSING
// =============================================================================

/// Parse `name<op>value` against the range of the named node.
///
/// Values of a node whose range is still empty are read as strings.
pub fn parse_event(net: &BayesNetwork, text: &str) -> Result<Event> {
    let (name, _, _) = MatchOp::split_expression(text)
        .ok_or_else(|| CliError::Usage(format!("'{text}' has no comparison operator")))?;
    let name = name.trim();
    let node = net
        .node(name)
        .ok_or_else(|| CliError::Usage(format!("'{name}' is not a node of the network")))?;
    let kind = node.range().tag().map_or(ScalarKind::Text, Tag::kind);
    Ok(Event::parse(text, kind)?)
}

/// Build `P(events | given)` from expression lists.
pub fn parse_query(
    net: &BayesNetwork,
    events: &[String],
    given: &[String],
) -> Result<ConditionalEvent> {
    if events.is_empty() {
        return Err(CliError::Usage("at least one --event is required".to_owned()));
    }
    let catenate = |exprs: &[String]| -> Result<EventCatenation> {
        let parsed = exprs
            .iter()
            .map(|e| parse_event(net, e))
            .collect::<Result<Vec<_>>>()?;
        Ok(EventCatenation::from_events(parsed)?)
    };
    Ok(ConditionalEvent::new(catenate(events)?, catenate(given)?)?)
}

// =============================================================================
// TRAIN COMMAND
// =============================================================================

/// Train the network on its data and report every node's a-priori.
pub fn cmd_train(config_path: &Path) -> Result<TrainReport> {
    let config = NetworkConfig::load(config_path)?;
    let table = config.load_table()?;
    let net = config.train_on(&table)?;
    let rows = table.len();

    let mut nodes = Vec::with_capacity(net.len());
    for name in net.breadth_first_node_names()? {
        let Some(node) = net.node(&name) else {
            continue;
        };
        let apriori = node
            .apriori()
            .and_then(|d| d.as_discrete())
            .map(|table| {
                table
                    .blocks()
                    .filter(|(condition, _)| condition.is_empty())
                    .flat_map(|(_, block)| block.iter())
                    .filter_map(|(event, p)| event.value().map(|v| (v.to_string(), *p)))
                    .collect()
            })
            .unwrap_or_default();
        nodes.push(NodeReport {
            parents: net.parent_nodes(&name)?,
            name,
            description: node.description().to_owned(),
            family: node.distribution().kind_name().to_owned(),
            range: node.range().to_string(),
            apriori,
        });
    }
    Ok(TrainReport { rows, nodes })
}

pub fn train_text(report: &TrainReport) -> String {
    let mut out = format!("Trained on {} rows\n", report.rows);
    for node in &report.nodes {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", node.name, node.family);
        if !node.description.is_empty() {
            let _ = writeln!(out, "  {}", node.description);
        }
        if !node.parents.is_empty() {
            let _ = writeln!(out, "  parents: {}", node.parents.join(", "));
        }
        let _ = writeln!(out, "  range:   {}", node.range);
        if node.apriori.is_empty() {
            let _ = writeln!(out, "  a-priori not available");
        }
        for (value, p) in &node.apriori {
            let _ = writeln!(out, "  P({}={}) = {:.6}", node.name, value, p);
        }
    }
    out
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

pub fn cmd_query(config_path: &Path, events: &[String], given: &[String]) -> Result<QueryReport> {
    let net = NetworkConfig::load(config_path)?.trained_network()?;
    let query = parse_query(&net, events, given)?;
    let reduced = net.bayes_ball(&query)?.reduced;
    let probability = net.probability(&query)?;
    Ok(QueryReport {
        query: query.to_string(),
        reduced: reduced.to_string(),
        probability,
    })
}

pub fn query_text(report: &QueryReport) -> String {
    let mut out = format!("{} = {:.6}\n", report.query, report.probability);
    if report.reduced != report.query {
        let _ = writeln!(out, "  evaluated as {}", report.reduced);
    }
    out
}

// =============================================================================
// INDEPENDENCE COMMAND
// =============================================================================

/// Bayes-Ball relevance of the evidence. Needs no data; values are read
/// as strings when the network is untrained.
pub fn cmd_independence(
    config_path: &Path,
    events: &[String],
    given: &[String],
) -> Result<IndependenceReport> {
    let config = NetworkConfig::load(config_path)?;
    let net = if config.data.is_some() {
        config.trained_network()?
    } else {
        config.build_network()?
    };
    let query = parse_query(&net, events, given)?;
    let relevance = net.bayes_ball(&query)?;
    Ok(IndependenceReport {
        query: query.to_string(),
        reduced: relevance.reduced.to_string(),
        dropped_evidence: relevance
            .dropped_evidence(&query)
            .map(str::to_owned)
            .collect(),
        irrelevant: relevance.irrelevant.into_iter().collect(),
        requisite: relevance.requisite.into_iter().collect(),
    })
}

pub fn independence_text(report: &IndependenceReport) -> String {
    let mut out = format!("{}\n", report.query);
    let _ = writeln!(out, "  reduced:    {}", report.reduced);
    let _ = writeln!(out, "  irrelevant: {}", list(&report.irrelevant));
    let _ = writeln!(out, "  dropped:    {}", list(&report.dropped_evidence));
    let _ = writeln!(out, "  requisite:  {}", list(&report.requisite));
    out
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_owned()
    } else {
        names.join(", ")
    }
}

// =============================================================================
// ORDER / COMPONENTS COMMANDS
// =============================================================================

pub fn cmd_order(config_path: &Path) -> Result<OrderReport> {
    let net = NetworkConfig::load(config_path)?.build_network()?;
    Ok(OrderReport {
        order: net.breadth_first_node_names()?,
    })
}

pub fn order_text(report: &OrderReport) -> String {
    format!("{}\n", report.order.join(" -> "))
}

pub fn cmd_components(config_path: &Path) -> Result<ComponentsReport> {
    let net = NetworkConfig::load(config_path)?.build_network()?;
    let components = net
        .independent_subnetworks()
        .iter()
        .map(BayesNetwork::breadth_first_node_names)
        .collect::<probnet_core::Result<Vec<_>>>()?;
    Ok(ComponentsReport { components })
}

pub fn components_text(report: &ComponentsReport) -> String {
    let mut out = String::new();
    for (i, component) in report.components.iter().enumerate() {
        let _ = writeln!(out, "{}: {}", i + 1, component.join(", "));
    }
    out
}
