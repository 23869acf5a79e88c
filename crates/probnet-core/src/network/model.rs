//! # Bayesian Network
//!
//! Named nodes over a directed acyclic graph. The graph stores node names
//! as vertex properties; nodes live in a name-keyed map beside it, so
//! there are no references between nodes.

use super::node::BayesNode;
use crate::distribution::{DiscreteDistribution, Distribution, ProbabilityFunction, Sample};
use crate::error::{ProbNetError, Result};
use crate::event::{Event, EventCatenation};
use crate::graph::{DagPolicy, Graph, VertexId};
use crate::range::ValueRange;
use crate::table::Table;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Graph of cause-effect edges between node names.
pub type NetworkGraph = Graph<String, (), DagPolicy>;

#[derive(Debug, Clone, Default)]
pub struct BayesNetwork {
    graph: NetworkGraph,
    nodes: BTreeMap<String, BayesNode>,
}

impl BayesNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Add a node. Names are unique.
    pub fn add_node(&mut self, node: BayesNode) -> Result<()> {
        if self.nodes.contains_key(node.name()) {
            return Err(ProbNetError::VertexExistence(format!(
                "node '{}' already exists",
                node.name()
            )));
        }
        self.graph.add_vertex(node.name().to_owned())?;
        self.nodes.insert(node.name().to_owned(), node);
        Ok(())
    }

    /// Remove a node with its edges. Its children lose a parent, so their
    /// distributions are reset.
    pub fn remove_node(&mut self, name: &str) -> Result<BayesNode> {
        let vertex = self.vertex_of(name)?;
        let children = self.names_of(self.graph.children(vertex));
        self.graph.remove_vertex(vertex)?;
        for child in children {
            self.reset_distribution(&child);
        }
        self.clear_apriori();
        self.nodes
            .remove(name)
            .ok_or_else(|| ProbNetError::VertexExistence(format!("node '{name}' does not exist")))
    }

    /// Add the edge `cause -> effect`, creating missing nodes.
    ///
    /// Fails with `Cycle` when the edge would close a directed cycle and
    /// with `ParallelEdge` when it already exists; nodes created by the
    /// failed call are removed again.
    pub fn add_cause_effect(&mut self, cause: &str, effect: &str) -> Result<()> {
        let mut created = Vec::new();
        for name in [cause, effect] {
            if !self.nodes.contains_key(name) {
                self.add_node(BayesNode::new(name))?;
                created.push(name);
            }
        }
        let source = self.vertex_of(cause)?;
        let target = self.vertex_of(effect)?;
        if let Err(error) = self.graph.add_edge(source, target, ()) {
            for name in created {
                if let Ok(vertex) = self.vertex_of(name) {
                    self.graph.remove_vertex(vertex)?;
                }
                self.nodes.remove(name);
            }
            return Err(error);
        }
        self.reset_distribution(effect);
        self.clear_apriori();
        debug!(cause, effect, "cause-effect edge added");
        Ok(())
    }

    fn reset_distribution(&mut self, name: &str) {
        if let Some(node) = self.nodes.get_mut(name) {
            let range = node.range().clone();
            node.set_range(range);
        }
    }

    fn clear_apriori(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_apriori(None);
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn node(&self, name: &str) -> Option<&BayesNode> {
        self.nodes.get(name)
    }

    pub(crate) fn node_ref(&self, name: &str) -> Result<&BayesNode> {
        self.nodes
            .get(name)
            .ok_or_else(|| ProbNetError::VertexExistence(format!("node '{name}' does not exist")))
    }

    /// Nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &BayesNode> {
        self.nodes.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn vertex_of(&self, name: &str) -> Result<VertexId> {
        self.graph
            .find_vertex(&name.to_owned())
            .ok_or_else(|| ProbNetError::VertexExistence(format!("node '{name}' does not exist")))
    }

    pub(crate) fn names_of(&self, ids: impl IntoIterator<Item = VertexId>) -> Vec<String> {
        ids.into_iter()
            .filter_map(|id| self.graph.vertex(id).cloned())
            .collect()
    }

    /// Node names in topological order: every parent precedes its children.
    pub fn breadth_first_node_names(&self) -> Result<Vec<String>> {
        Ok(self.names_of(self.graph.topological_order()?))
    }

    pub fn children_nodes(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.names_of(self.graph.children(self.vertex_of(name)?)))
    }

    pub fn parent_nodes(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.names_of(self.graph.parents(self.vertex_of(name)?)))
    }

    /// Parents and children of a node, by name.
    pub fn connected_nodes(&self, name: &str) -> Result<Vec<String>> {
        let vertex = self.vertex_of(name)?;
        let neighbours: BTreeSet<VertexId> = self
            .graph
            .parents(vertex)
            .into_iter()
            .chain(self.graph.children(vertex))
            .collect();
        let mut names = self.names_of(neighbours);
        names.sort();
        Ok(names)
    }

    /// Names of `names` and all their ancestors.
    pub fn ancestral_set<'a, I>(&self, names: I) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let vertex = self.vertex_of(name)?;
            set.insert(name.to_owned());
            set.extend(self.names_of(self.graph.ancestors(vertex)));
        }
        Ok(set)
    }

    /// Weakly connected parts of the network as separate networks.
    pub fn independent_subnetworks(&self) -> Vec<BayesNetwork> {
        self.graph
            .get_disconnected_subgraphs()
            .into_iter()
            .map(|graph| {
                let nodes = graph
                    .vertices()
                    .filter_map(|(_, name)| {
                        self.nodes.get(name).map(|n| (name.clone(), n.clone()))
                    })
                    .collect();
                BayesNetwork { graph, nodes }
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Parameters
    // -------------------------------------------------------------------------

    /// Install a distribution for a node. Its condition names must be
    /// exactly the node's parents; the node adopts its event range.
    pub fn set_distribution(&mut self, name: &str, distribution: Distribution) -> Result<()> {
        let parents: BTreeSet<String> = self.parent_nodes(name)?.into_iter().collect();
        let conditions: BTreeSet<String> = distribution
            .domain()
            .condition_names()
            .map(str::to_owned)
            .collect();
        if parents != conditions {
            return Err(ProbNetError::distribution(format!(
                "distribution of '{name}' is conditioned on {conditions:?}, parents are {parents:?}"
            )));
        }
        let range = distribution
            .domain()
            .event_range(name)
            .cloned()
            .unwrap_or_default();
        let node = self
            .nodes
            .get_mut(name)
            .ok_or_else(|| ProbNetError::VertexExistence(format!("node '{name}' does not exist")))?;
        let mut updated = node.clone();
        updated.set_range(range);
        updated.set_distribution(distribution)?;
        *node = updated;
        self.clear_apriori();
        Ok(())
    }

    /// Whether every node can answer queries.
    pub fn fully_defined(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.values().all(BayesNode::fully_defined)
    }

    /// Train every node from a table whose header names the nodes.
    ///
    /// Each node is trained on its own column with its parents' columns as
    /// the condition side, weighted by the table's row weights. With
    /// `is_discrete` every node gets a table; otherwise `float`,
    /// `gaussian` and `exponential` columns select the continuous family.
    /// Discrete tables are canonized over the parents' ranges. The network
    /// is left unchanged on failure.
    pub fn train_with_table(&mut self, table: &Table, is_discrete: bool) -> Result<()> {
        if table.is_empty() {
            return Err(ProbNetError::Table("cannot train from an empty table".to_owned()));
        }
        let order = self.breadth_first_node_names()?;
        let mut columns = BTreeMap::new();
        for name in &order {
            let column = table.column_index(name).ok_or_else(|| {
                ProbNetError::Table(format!("table has no column for node '{name}'"))
            })?;
            columns.insert(name.as_str(), column);
        }

        let mut ranges: BTreeMap<&str, ValueRange> = BTreeMap::new();
        for name in &order {
            let column = columns[name.as_str()];
            let continuous = table
                .types()
                .get(column)
                .and_then(|t| t.continuous_kind())
                .filter(|_| !is_discrete);
            let range = match continuous {
                Some(kind) => {
                    let mut range = ValueRange::continuous(kind);
                    for x in table.column(column).filter_map(|v| v.as_f64()) {
                        range.extend_bounds(x);
                    }
                    range
                }
                None => {
                    let node = self.node_ref(name)?;
                    let mut range = if node.is_continuous() {
                        ValueRange::new()
                    } else {
                        node.range().clone()
                    };
                    for value in table.column(column) {
                        range.add(value.clone())?;
                    }
                    range
                }
            };
            ranges.insert(name.as_str(), range);
        }

        let mut trained = BTreeMap::new();
        for name in &order {
            let column = columns[name.as_str()];
            let parents = self.parent_nodes(name)?;
            for parent in &parents {
                if ranges[parent.as_str()].is_continuous() {
                    return Err(ProbNetError::distribution(format!(
                        "continuous node '{parent}' cannot condition '{name}'"
                    )));
                }
            }

            let mut samples = Vec::with_capacity(table.len());
            for (row, weight) in table.rows().iter().zip(table.weights()) {
                let condition = EventCatenation::from_events(
                    parents
                        .iter()
                        .map(|p| Event::equals(p.as_str(), row[columns[p.as_str()]].clone())),
                )?;
                samples.push(Sample::new(
                    Event::equals(name.as_str(), row[column].clone()),
                    condition,
                    *weight,
                ));
            }

            let range = ranges[name.as_str()].clone();
            let mut distribution = Distribution::for_range(name, &range);
            for parent in &parents {
                distribution
                    .domain_mut()
                    .set_condition_range(parent.clone(), ranges[parent.as_str()].clone());
            }
            distribution.train(&samples)?;
            if let Distribution::Discrete(cpt) = &mut distribution {
                cpt.canonize()?;
                cpt.normalize()?;
            }
            debug!(
                node = %name,
                family = distribution.kind_name(),
                samples = samples.len(),
                "node trained"
            );
            trained.insert(name.clone(), (range, distribution));
        }

        let previous = self.nodes.clone();
        let installed = trained
            .into_iter()
            .try_for_each(|(name, (range, distribution))| {
                let node = self.nodes.get_mut(&name).ok_or_else(|| {
                    ProbNetError::VertexExistence(format!("node '{name}' does not exist"))
                })?;
                node.set_range(range);
                node.set_distribution(distribution)
            })
            .and_then(|()| self.compute_apriori());
        if let Err(error) = installed {
            self.nodes = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Propagate marginals in topological order:
    /// `P(X) = Σ_π P(X | π) · Π P(Pi = π_i)`.
    ///
    /// Roots copy their distribution. Continuous nodes, and nodes with a
    /// parent lacking a discrete marginal, are skipped with a warning.
    pub fn compute_apriori(&mut self) -> Result<()> {
        let order = self.breadth_first_node_names()?;
        let mut marginals: BTreeMap<String, Option<Distribution>> = BTreeMap::new();
        for name in &order {
            let node = self.node_ref(name)?;
            if !node.fully_defined() {
                return Err(ProbNetError::distribution(format!(
                    "node '{name}' is not fully defined"
                )));
            }
            let Some(table) = node.distribution().as_discrete() else {
                warn!(node = %name, "a-priori not propagated for continuous node");
                marginals.insert(name.clone(), None);
                continue;
            };
            let parents = self.parent_nodes(name)?;
            if parents.is_empty() {
                marginals.insert(name.clone(), Some(node.distribution().clone()));
                continue;
            }

            let mut parent_marginals = Vec::with_capacity(parents.len());
            let mut parent_ranges = Vec::with_capacity(parents.len());
            for parent in &parents {
                let marginal = marginals
                    .get(parent)
                    .and_then(Option::as_ref)
                    .and_then(Distribution::as_discrete);
                parent_marginals.push((parent.as_str(), marginal));
                parent_ranges.push((parent.as_str(), self.node_ref(parent)?.range()));
            }
            if parent_marginals.iter().any(|(_, m)| m.is_none()) {
                warn!(node = %name, "a-priori not propagated: a parent has no discrete marginal");
                marginals.insert(name.clone(), None);
                continue;
            }

            let unconditioned = EventCatenation::new();
            let mut mass: BTreeMap<Event, f64> = node
                .range()
                .make_event_collection(name)
                .into_iter()
                .map(|event| (event, 0.0))
                .collect();
            for assignment in EventCatenation::cross_product(parent_ranges)? {
                let weight: f64 = parent_marginals
                    .iter()
                    .map(|(parent, marginal)| {
                        assignment
                            .get(parent)
                            .zip(*marginal)
                            .and_then(|(event, m)| m.get(event, &unconditioned))
                            .unwrap_or(0.0)
                    })
                    .product();
                if weight == 0.0 {
                    continue;
                }
                for (event, total) in &mut mass {
                    *total += table.get(event, &assignment).unwrap_or(0.0) * weight;
                }
            }

            let mut marginal = DiscreteDistribution::new(name, node.range().clone());
            for (event, p) in mass {
                marginal.set(event, EventCatenation::new(), p)?;
            }
            marginal.normalize()?;
            debug!(node = %name, "a-priori propagated");
            marginals.insert(name.clone(), Some(Distribution::Discrete(marginal)));
        }

        for (name, marginal) in marginals {
            if let Some(node) = self.nodes.get_mut(&name) {
                node.set_apriori(marginal);
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;
    use crate::variant::Variant;

    fn chain() -> BayesNetwork {
        let mut net = BayesNetwork::new();
        net.add_cause_effect("X", "Y").expect("x->y");
        net.add_cause_effect("Y", "Z").expect("y->z");
        net
    }

    fn text_table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_records(
            Some(header.iter().map(|h| (*h).to_owned()).collect()),
            Some(vec![ColumnType::Text; header.len()]),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
            false,
        )
        .expect("table")
    }

    #[test]
    fn cause_effect_creates_nodes() {
        let net = chain();
        assert_eq!(net.len(), 3);
        assert_eq!(net.parent_nodes("Y").expect("parents"), vec!["X"]);
        assert_eq!(net.children_nodes("Y").expect("children"), vec!["Z"]);
        assert_eq!(net.connected_nodes("Y").expect("connected"), vec!["X", "Z"]);
        assert_eq!(
            net.breadth_first_node_names().expect("order"),
            vec!["X", "Y", "Z"]
        );
    }

    #[test]
    fn cycle_is_refused_without_side_effects() {
        let mut net = chain();
        let err = net.add_cause_effect("Z", "X").expect_err("cycle");
        assert!(matches!(err, ProbNetError::Cycle(_)));

        let err = net.add_cause_effect("W", "W").expect_err("self loop");
        assert!(matches!(err, ProbNetError::Cycle(_)));
        assert!(!net.contains("W"));

        let err = net.add_cause_effect("X", "Y").expect_err("parallel");
        assert!(matches!(err, ProbNetError::ParallelEdge(_)));
    }

    #[test]
    fn duplicate_node_is_refused() {
        let mut net = BayesNetwork::new();
        net.add_node(BayesNode::new("A")).expect("first");
        assert!(matches!(
            net.add_node(BayesNode::new("A")),
            Err(ProbNetError::VertexExistence(_))
        ));
    }

    #[test]
    fn training_builds_canonical_tables() {
        let mut net = BayesNetwork::new();
        net.add_cause_effect("Cloud", "Rain").expect("edge");
        let table = text_table(
            &["Cloud", "Rain"],
            &[&["yes", "heavy"], &["yes", "none"], &["no", "none"]],
        );
        net.train_with_table(&table, true).expect("train");
        assert!(net.fully_defined());

        let rain = net.node("Rain").expect("rain");
        let cpt = rain.distribution().as_discrete().expect("discrete");
        let no_cloud =
            EventCatenation::from_events([Event::equals("Cloud", "no")]).expect("condition");
        assert_eq!(cpt.get(&Event::equals("Rain", "heavy"), &no_cloud), Some(0.0));
        assert_eq!(cpt.get(&Event::equals("Rain", "none"), &no_cloud), Some(1.0));

        let apriori = rain.apriori().and_then(Distribution::as_discrete).expect("apriori");
        let heavy = apriori
            .get(&Event::equals("Rain", "heavy"), &EventCatenation::new())
            .expect("heavy");
        assert!((heavy - 2.0 / 3.0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_column_leaves_network_untouched() {
        let mut net = chain();
        let before = net.node("Z").cloned();
        let table = text_table(&["X", "Y"], &[&["a", "b"]]);
        assert!(matches!(
            net.train_with_table(&table, true),
            Err(ProbNetError::Table(_))
        ));
        assert_eq!(net.node("Z").cloned(), before);
        assert!(!net.fully_defined());
    }

    #[test]
    fn continuous_leaf_is_trained_by_column_type() {
        let mut net = BayesNetwork::new();
        net.add_cause_effect("Season", "Temp").expect("edge");
        let table = Table::from_records(
            Some(vec!["Season".to_owned(), "Temp".to_owned()]),
            Some(vec![ColumnType::Text, ColumnType::Gaussian]),
            vec![
                vec!["winter".to_owned(), "1.0".to_owned()],
                vec!["winter".to_owned(), "3.0".to_owned()],
                vec!["summer".to_owned(), "20.0".to_owned()],
            ],
            false,
        )
        .expect("table");
        net.train_with_table(&table, false).expect("train");
        let temp = net.node("Temp").expect("temp");
        assert_eq!(temp.distribution().kind_name(), "gaussian");
        assert!(temp.apriori().is_none());
        assert_eq!(temp.range().bounds(), Some((Some(1.0), Some(20.0))));
    }

    #[test]
    fn continuous_parent_is_rejected() {
        let mut net = BayesNetwork::new();
        net.add_cause_effect("Temp", "Season").expect("edge");
        let table = Table::from_records(
            Some(vec!["Temp".to_owned(), "Season".to_owned()]),
            Some(vec![ColumnType::Float, ColumnType::Text]),
            vec![vec!["1.5".to_owned(), "winter".to_owned()]],
            false,
        )
        .expect("table");
        assert!(matches!(
            net.train_with_table(&table, false),
            Err(ProbNetError::Distribution(_))
        ));
    }

    #[test]
    fn subnetworks_split_components() {
        let mut net = chain();
        net.add_cause_effect("A", "B").expect("a->b");
        let parts = net.independent_subnetworks();
        assert_eq!(parts.len(), 2);
        let names: Vec<Vec<String>> = parts
            .iter()
            .map(|p| p.nodes().map(|n| n.name().to_owned()).collect())
            .collect();
        assert_eq!(names, vec![vec!["X", "Y", "Z"], vec!["A", "B"]]);
        assert_eq!(
            parts[1].parent_nodes("B").expect("parents"),
            vec!["A".to_owned()]
        );
    }

    #[test]
    fn installed_distribution_must_match_parents() {
        let mut net = chain();
        let mut orphan = DiscreteDistribution::new("Y", ValueRange::new());
        orphan
            .set(Event::equals("Y", Variant::Bool(true)), EventCatenation::new(), 1.0)
            .expect("set");
        assert!(net.set_distribution("Y", Distribution::Discrete(orphan)).is_err());
    }
}
