//! # Exact Inference
//!
//! `P(Q | E) = P(Q, E) / P(E)`, each joint summed over the discrete
//! variables of its ancestral set after Bayes-Ball has dropped irrelevant
//! evidence. Continuous nodes are only allowed as query or evidence leaves
//! of that set, where their factor is a probability mass over the event's
//! interval.

use super::model::BayesNetwork;
use super::node::BayesNode;
use crate::distribution::ProbabilityFunction;
use crate::error::{ProbNetError, Result};
use crate::event::{ConditionalEvent, Event, EventCatenation};
use crate::primitives::MAX_ENUMERATED_ASSIGNMENTS;
use crate::variant::{MatchOp, Variant};
use std::collections::BTreeMap;

/// One variable of the enumeration, in topological order.
enum Slot<'n> {
    /// Discrete node summed over the values its event admits.
    Sum {
        node: &'n BayesNode,
        parents: Vec<String>,
        values: Vec<Variant>,
    },
    /// Continuous leaf with a fixed event.
    Fixed {
        node: &'n BayesNode,
        parents: Vec<String>,
        event: Event,
    },
}

type Assignment = BTreeMap<String, Variant>;

fn parent_condition(parents: &[String], assignment: &Assignment) -> Result<EventCatenation> {
    EventCatenation::from_events(parents.iter().filter_map(|parent| {
        assignment
            .get(parent)
            .map(|value| Event::equals(parent.as_str(), value.clone()))
    }))
}

fn factor(node: &BayesNode, value: &Variant, condition: &EventCatenation) -> Result<f64> {
    let event = Event::equals(node.name(), value.clone());
    match node.distribution().as_discrete() {
        Some(table) => Ok(table.get(&event, condition).unwrap_or(0.0)),
        None => node
            .distribution()
            .probability(&ConditionalEvent::single(event, condition.clone())?),
    }
}

fn sum_slots(slots: &[Slot<'_>], assignment: &mut Assignment) -> Result<f64> {
    let Some((slot, rest)) = slots.split_first() else {
        return Ok(1.0);
    };
    match slot {
        Slot::Fixed {
            node,
            parents,
            event,
        } => {
            let condition = parent_condition(parents, assignment)?;
            let p = node
                .distribution()
                .probability(&ConditionalEvent::single(event.clone(), condition)?)?;
            if p == 0.0 {
                return Ok(0.0);
            }
            Ok(p * sum_slots(rest, assignment)?)
        }
        Slot::Sum {
            node,
            parents,
            values,
        } => {
            let condition = parent_condition(parents, assignment)?;
            let mut total = 0.0;
            for value in values {
                let p = factor(node, value, &condition)?;
                if p == 0.0 {
                    continue;
                }
                assignment.insert(node.name().to_owned(), value.clone());
                total += p * sum_slots(rest, assignment)?;
            }
            assignment.remove(node.name());
            Ok(total)
        }
    }
}

impl BayesNetwork {
    /// Probability of a conjunction of events over the network's nodes.
    pub fn joint_probability(&self, events: &EventCatenation) -> Result<f64> {
        if events.is_empty() {
            return Ok(1.0);
        }
        let relevant = self.ancestral_set(events.names())?;
        let mut slots = Vec::with_capacity(relevant.len());
        let mut assignments: u64 = 1;
        for name in self.breadth_first_node_names()? {
            if !relevant.contains(&name) {
                continue;
            }
            let node = self.node_ref(&name)?;
            let parents = self.parent_nodes(&name)?;
            let event = events.get(&name);
            if node.is_continuous() {
                let Some(event) = event else {
                    return Err(ProbNetError::distribution(format!(
                        "continuous node '{name}' cannot be summed out"
                    )));
                };
                let has_relevant_child = self
                    .children_nodes(&name)?
                    .iter()
                    .any(|child| relevant.contains(child));
                if has_relevant_child {
                    return Err(ProbNetError::distribution(format!(
                        "continuous node '{name}' cannot condition other nodes"
                    )));
                }
                slots.push(Slot::Fixed {
                    node,
                    parents,
                    event: event.clone(),
                });
            } else {
                let values: Vec<Variant> = node
                    .range()
                    .values()
                    .filter(|value| event.is_none_or(|e| e.matches_value(value)))
                    .cloned()
                    .collect();
                if values.is_empty() {
                    return Ok(0.0);
                }
                assignments = assignments.saturating_mul(values.len() as u64);
                if assignments > MAX_ENUMERATED_ASSIGNMENTS {
                    return Err(ProbNetError::distribution(format!(
                        "{assignments} assignments exceed the enumeration limit"
                    )));
                }
                slots.push(Slot::Sum {
                    node,
                    parents,
                    values,
                });
            }
        }
        sum_slots(&slots, &mut Assignment::new())
    }

    /// `P(Q | E)` by enumeration.
    ///
    /// Fails when the network is not fully defined, when a name is not a
    /// node, for placeholder events, and when the evidence has
    /// probability zero.
    pub fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        if query.event().is_empty() {
            return Err(ProbNetError::Event("query has no event".to_owned()));
        }
        if let Some(placeholder) = query
            .event()
            .iter()
            .chain(query.condition())
            .find(|e| e.op() == MatchOp::Placeholder)
        {
            return Err(ProbNetError::Event(format!(
                "'{placeholder}' is a placeholder"
            )));
        }
        if !self.fully_defined() {
            return Err(ProbNetError::distribution("network is not fully defined"));
        }

        let reduced = self.bayes_ball(query)?.reduced;
        let numerator = self.joint_probability(&reduced.joint()?)?;
        let denominator = self.joint_probability(reduced.condition())?;
        if denominator <= 0.0 {
            return Err(ProbNetError::distribution(format!(
                "evidence {} has probability zero",
                reduced.condition()
            )));
        }
        Ok((numerator / denominator).clamp(0.0, 1.0))
    }

    /// Product of the chain-rule factors of `query` in `order`. Agrees
    /// with [`BayesNetwork::probability`] up to rounding.
    pub fn chain_rule_probability(&self, query: &ConditionalEvent, order: &[&str]) -> Result<f64> {
        query
            .chain_rule(order)?
            .iter()
            .try_fold(1.0, |product, step| Ok(product * self.probability(step)?))
    }
}

// =============================================================================
// TESTS
// =============================================================================
