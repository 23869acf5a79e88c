//! # Bayes-Ball
//!
//! Linear-time relevance analysis for a query `P(Q | E)`. A ball starts at
//! every query node as if sent from a child and bounces through the graph:
//!
//! | node       | reached from a child            | reached from a parent        |
//! |------------|---------------------------------|------------------------------|
//! | unobserved | pass to parents and children    | pass to children             |
//! | observed   | blocked                         | bounce back to its parents   |
//!
//! Each node passes to its parents at most once (top mark) and to its
//! children at most once (bottom mark). Nodes the ball never reaches are
//! d-separated from `Q` given `E`; evidence on them can be dropped.

use super::model::BayesNetwork;
use crate::error::Result;
use crate::event::ConditionalEvent;
use crate::graph::VertexId;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrival {
    FromChild,
    FromParent,
}

/// Result of a Bayes-Ball pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    /// Nodes the ball reached.
    pub visited: BTreeSet<String>,
    /// Nodes whose distributions the query needs (top-marked).
    pub requisite: BTreeSet<String>,
    /// Nodes the ball never reached.
    pub irrelevant: BTreeSet<String>,
    /// The query with evidence on irrelevant nodes removed.
    pub reduced: ConditionalEvent,
}

impl Relevance {
    /// Evidence names the reduction dropped.
    pub fn dropped_evidence<'a>(
        &'a self,
        query: &'a ConditionalEvent,
    ) -> impl Iterator<Item = &'a str> {
        query
            .condition()
            .names()
            .filter(|name| self.irrelevant.contains(*name))
    }
}

struct Marks {
    visited: BTreeSet<VertexId>,
    top: BTreeSet<VertexId>,
    bottom: BTreeSet<VertexId>,
}

impl BayesNetwork {
    fn bounce(&self, targets: &BTreeSet<VertexId>, evidence: &BTreeSet<VertexId>) -> Marks {
        let graph = self.graph();
        let mut marks = Marks {
            visited: BTreeSet::new(),
            top: BTreeSet::new(),
            bottom: BTreeSet::new(),
        };
        let mut schedule: VecDeque<(VertexId, Arrival)> =
            targets.iter().map(|&v| (v, Arrival::FromChild)).collect();

        while let Some((vertex, arrival)) = schedule.pop_front() {
            marks.visited.insert(vertex);
            let observed = evidence.contains(&vertex);
            let (to_parents, to_children) = match (observed, arrival) {
                (false, Arrival::FromChild) => (true, true),
                (false, Arrival::FromParent) => (false, true),
                (true, Arrival::FromParent) => (true, false),
                (true, Arrival::FromChild) => (false, false),
            };
            if to_parents && marks.top.insert(vertex) {
                schedule.extend(
                    graph
                        .parents(vertex)
                        .into_iter()
                        .map(|p| (p, Arrival::FromChild)),
                );
            }
            if to_children && marks.bottom.insert(vertex) {
                schedule.extend(
                    graph
                        .children(vertex)
                        .into_iter()
                        .map(|c| (c, Arrival::FromParent)),
                );
            }
        }
        marks
    }

    /// Run Bayes-Ball for `query` and reduce its evidence.
    ///
    /// Every event and condition name must be a node of the network.
    pub fn bayes_ball(&self, query: &ConditionalEvent) -> Result<Relevance> {
        let targets = query
            .event()
            .names()
            .map(|name| self.vertex_of(name))
            .collect::<Result<BTreeSet<_>>>()?;
        let evidence = query
            .condition()
            .names()
            .map(|name| self.vertex_of(name))
            .collect::<Result<BTreeSet<_>>>()?;

        let marks = self.bounce(&targets, &evidence);
        let unreached = self
            .graph()
            .vertex_ids()
            .filter(|v| !marks.visited.contains(v));
        let irrelevant: BTreeSet<String> = self.names_of(unreached).into_iter().collect();

        let mut condition = query.condition().clone();
        condition.retain(|name| !irrelevant.contains(name));
        let reduced = ConditionalEvent::new(query.event().clone(), condition)?;
        debug!(
            query = %query,
            reduced = %reduced,
            irrelevant = irrelevant.len(),
            "bayes-ball pass"
        );

        Ok(Relevance {
            visited: self.names_of(marks.visited).into_iter().collect(),
            requisite: self.names_of(marks.top).into_iter().collect(),
            irrelevant,
            reduced,
        })
    }

    /// Whether `a` and `b` are d-separated given the nodes in `given`.
    pub fn d_separated(&self, a: &str, b: &str, given: &[&str]) -> Result<bool> {
        let targets = BTreeSet::from([self.vertex_of(a)?]);
        let evidence = given
            .iter()
            .map(|name| self.vertex_of(name))
            .collect::<Result<BTreeSet<_>>>()?;
        let other = self.vertex_of(b)?;
        let marks = self.bounce(&targets, &evidence);
        Ok(!marks.visited.contains(&other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventCatenation};

    fn network(edges: &[(&str, &str)]) -> BayesNetwork {
        let mut net = BayesNetwork::new();
        for (cause, effect) in edges {
            net.add_cause_effect(cause, effect).expect("edge");
        }
        net
    }

    fn query(event: &str, given: &[&str]) -> ConditionalEvent {
        ConditionalEvent::new(
            EventCatenation::from_events([Event::equals(event, 1_i64)]).expect("event"),
            EventCatenation::from_events(given.iter().map(|g| Event::equals(*g, 1_i64)))
                .expect("condition"),
        )
        .expect("query")
    }

    #[test]
    fn observed_middle_of_chain_blocks() {
        let net = network(&[("X", "Y"), ("Y", "Z")]);
        let q = query("Z", &["X", "Y"]);
        let relevance = net.bayes_ball(&q).expect("ball");
        assert!(relevance.irrelevant.contains("X"));
        assert!(!relevance.irrelevant.contains("Y"));
        assert_eq!(relevance.reduced.to_string(), "P(Z=1 | Y=1)");
        assert_eq!(relevance.dropped_evidence(&q).collect::<Vec<_>>(), vec!["X"]);
    }

    #[test]
    fn unobserved_chain_is_open() {
        let net = network(&[("X", "Y"), ("Y", "Z")]);
        let relevance = net.bayes_ball(&query("Z", &["X"])).expect("ball");
        assert!(relevance.irrelevant.is_empty());
        assert!(!net.d_separated("X", "Z", &[]).expect("d-sep"));
        assert!(net.d_separated("X", "Z", &["Y"]).expect("d-sep"));
    }

    #[test]
    fn collider_opens_when_observed() {
        let net = network(&[("A", "C"), ("B", "C")]);
        assert!(net.d_separated("A", "B", &[]).expect("d-sep"));
        assert!(!net.d_separated("A", "B", &["C"]).expect("d-sep"));
    }

    #[test]
    fn observed_descendant_of_collider_opens_it() {
        let net = network(&[("A", "C"), ("B", "C"), ("C", "D")]);
        assert!(!net.d_separated("A", "B", &["D"]).expect("d-sep"));
    }

    #[test]
    fn common_cause_blocks_when_observed() {
        let net = network(&[("Cloud", "Rain"), ("Cloud", "Sprinkler")]);
        assert!(!net.d_separated("Rain", "Sprinkler", &[]).expect("d-sep"));
        assert!(net.d_separated("Rain", "Sprinkler", &["Cloud"]).expect("d-sep"));
    }

    #[test]
    fn unknown_nodes_fail() {
        let net = network(&[("X", "Y")]);
        assert!(net.bayes_ball(&query("Q", &[])).is_err());
    }
}
