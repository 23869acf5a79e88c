//! # Discrete Distribution
//!
//! A probability table per condition block: for each assignment of the
//! condition variables, one probability per event value.

use super::domain::Domain;
use super::{ProbabilityFunction, Sample, check_weights};
use crate::error::{ProbNetError, Result};
use crate::event::{ConditionalEvent, Event, EventCatenation};
use crate::primitives::DISTRIBUTION_TOLERANCE;
use crate::range::ValueRange;
use crate::variant::MatchOp;
use std::collections::BTreeMap;
use tracing::debug;

/// Condition block -> event -> probability.
type Table = BTreeMap<EventCatenation, BTreeMap<Event, f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteDistribution {
    domain: Domain,
    table: Table,
}

impl DiscreteDistribution {
    /// An empty table over the event `name` with the given value range.
    pub fn new(name: &str, range: ValueRange) -> Self {
        Self {
            domain: Domain::for_event(name, range),
            table: Table::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of (condition, event) entries.
    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    /// Set one entry. The event must be an equality event.
    pub fn set(&mut self, event: Event, condition: EventCatenation, p: f64) -> Result<()> {
        if !p.is_finite() || p < 0.0 {
            return Err(ProbNetError::distribution(format!(
                "bad probability {p} for {event}"
            )));
        }
        if event.op() != MatchOp::Equal {
            return Err(ProbNetError::distribution(format!(
                "table entry '{event}' must be an equality"
            )));
        }
        self.observe(&event, &condition)?;
        self.table.entry(condition).or_default().insert(event, p);
        Ok(())
    }

    pub fn get(&self, event: &Event, condition: &EventCatenation) -> Option<f64> {
        self.table.get(condition)?.get(event).copied()
    }

    /// Every condition block with its entries, ascending.
    pub fn blocks(&self) -> impl Iterator<Item = (&EventCatenation, &BTreeMap<Event, f64>)> {
        self.table.iter()
    }

    fn observe(&mut self, event: &Event, condition: &EventCatenation) -> Result<()> {
        if let Some(value) = event.value() {
            self.domain.observe_event(event.name(), value)?;
        }
        for c in condition {
            if let Some(value) = c.value() {
                self.domain.observe_condition(c.name(), value)?;
            }
        }
        Ok(())
    }

    /// Scale every condition block to sum to 1.
    ///
    /// A block summing to zero becomes uniform over its entries. Fails
    /// without touching the table if any entry is negative.
    pub fn normalize(&mut self) -> Result<()> {
        if self.table.is_empty() {
            return Err(ProbNetError::distribution("cannot normalize an empty table"));
        }
        for (condition, block) in &self.table {
            if let Some((event, p)) = block.iter().find(|(_, p)| !p.is_finite() || **p < 0.0) {
                return Err(ProbNetError::distribution(format!(
                    "bad probability {p} for {event} | {condition}"
                )));
            }
        }
        for block in self.table.values_mut() {
            let sum: f64 = block.values().sum();
            if sum == 0.0 {
                let uniform = 1.0 / block.len() as f64;
                block.values_mut().for_each(|p| *p = uniform);
            } else {
                block.values_mut().for_each(|p| *p /= sum);
            }
        }
        Ok(())
    }

    /// Insert a zero entry for every combination of event and condition
    /// values the ranges admit.
    pub fn canonize(&mut self) -> Result<()> {
        let name = self.domain.event_name()?.to_owned();
        let events = self
            .domain
            .event_range(&name)
            .map(|r| r.make_event_collection(&name))
            .unwrap_or_default();
        if events.is_empty() {
            return Err(ProbNetError::distribution(format!(
                "event range of '{name}' is empty"
            )));
        }
        let conditions = EventCatenation::cross_product(
            self.domain
                .condition_ranges()
                .iter()
                .map(|(name, range)| (name.as_str(), range)),
        )?;
        for condition in conditions {
            let block = self.table.entry(condition).or_default();
            for event in &events {
                block.entry(event.clone()).or_insert(0.0);
            }
        }
        Ok(())
    }

    /// Every entry under each condition becomes `1 / |event values|`.
    pub fn make_uniform(&mut self) -> Result<()> {
        self.canonize()?;
        let name = self.domain.event_name()?;
        let count = self.domain.event_range(name).map_or(0, ValueRange::len);
        if count == 0 {
            return Err(ProbNetError::distribution(format!(
                "event range of '{name}' is empty"
            )));
        }
        let uniform = 1.0 / count as f64;
        for block in self.table.values_mut() {
            block.values_mut().for_each(|p| *p = uniform);
        }
        Ok(())
    }
}

impl ProbabilityFunction for DiscreteDistribution {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    /// Sum sample weights per (condition, event), then normalize.
    ///
    /// The fit is built on a copy; on failure `self` is unchanged.
    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        check_weights(samples)?;
        let mut fitted = Self {
            domain: self.domain.clone(),
            table: Table::new(),
        };
        for sample in samples {
            if sample.event.op() != MatchOp::Equal {
                return Err(ProbNetError::distribution(format!(
                    "training sample '{}' must be an equality",
                    sample.event
                )));
            }
            fitted.observe(&sample.event, &sample.condition)?;
            *fitted
                .table
                .entry(sample.condition.clone())
                .or_default()
                .entry(sample.event.clone())
                .or_insert(0.0) += sample.weight;
        }
        fitted.normalize()?;
        debug!(
            event = fitted.domain.event_name().unwrap_or("?"),
            blocks = fitted.table.len(),
            "discrete table trained"
        );
        *self = fitted;
        Ok(())
    }

    /// Exact lookup for equality events; otherwise the sum of the entries
    /// the event matches.
    fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        self.domain.check_possible(query)?;
        let event = self.domain.single_event(query)?;
        if !self.is_distribution() {
            return Err(ProbNetError::distribution(
                "table is not a distribution; normalize it first",
            ));
        }
        let key = self.domain.parameter_key(query)?;
        let block = self.table.get(&key).ok_or_else(|| {
            ProbNetError::distribution(format!("no parameters for condition {key}"))
        })?;
        if event.op() == MatchOp::Equal {
            return Ok(block.get(event).copied().unwrap_or(0.0));
        }
        Ok(block
            .iter()
            .filter(|(entry, _)| entry.value().is_some_and(|v| event.matches_value(v)))
            .map(|(_, p)| *p)
            .sum())
    }

    fn is_distribution(&self) -> bool {
        !self.table.is_empty()
            && self.table.values().all(|block| {
                let sum: f64 = block.values().sum();
                (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE
            })
    }

    fn condition_blocks(&self) -> Vec<EventCatenation> {
        self.table.keys().cloned().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
