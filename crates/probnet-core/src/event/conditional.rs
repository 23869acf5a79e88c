//! # Conditional Event
//!
//! `P(event | condition)`: the argument every probability function and
//! every network query takes.

use super::catenation::EventCatenation;
use super::predicate::Event;
use crate::error::{ProbNetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An event conjunction conditioned on another conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionalEvent {
    event: EventCatenation,
    condition: EventCatenation,
}

impl ConditionalEvent {
    /// Pair two conjunctions. A name on both sides must carry the same
    /// event.
    pub fn new(event: EventCatenation, condition: EventCatenation) -> Result<Self> {
        for e in &event {
            if let Some(c) = condition.get(e.name())
                && e.conflicts(c)
            {
                return Err(ProbNetError::EventListConflict {
                    existing: e.to_string(),
                    incoming: c.to_string(),
                });
            }
        }
        Ok(Self { event, condition })
    }

    /// `P(event)` with no condition.
    pub fn unconditional(event: EventCatenation) -> Self {
        Self {
            event,
            condition: EventCatenation::new(),
        }
    }

    /// `P(event | condition)` for single events.
    pub fn single(event: Event, condition: EventCatenation) -> Result<Self> {
        Self::new(EventCatenation::from_events([event])?, condition)
    }

    pub fn event(&self) -> &EventCatenation {
        &self.event
    }

    pub fn condition(&self) -> &EventCatenation {
        &self.condition
    }

    /// Both sides as one conjunction.
    pub fn joint(&self) -> Result<EventCatenation> {
        self.event.merged(&self.condition)
    }

    /// Project the condition side onto `names`.
    ///
    /// Conditions outside `names` are dropped; names without a condition
    /// get a placeholder. The event side is unchanged.
    pub fn filter_conditions<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = names.into_iter().map(|s| s.as_ref().to_owned()).collect();
        let mut condition = self.condition.clone();
        condition.retain(|name| wanted.contains(name));
        for name in &wanted {
            condition.fill_placeholder(name);
        }
        Self {
            event: self.event.clone(),
            condition,
        }
    }

    /// Reshape `P(A1..An | C)` into `P(A1 | A2..An, C) .. P(An | C)`.
    ///
    /// `order` lists the event names `A1..An`; an empty order uses name
    /// order. Every event name must appear exactly once.
    pub fn chain_rule(&self, order: &[&str]) -> Result<Vec<ConditionalEvent>> {
        let order: Vec<&str> = if order.is_empty() {
            self.event.names().collect()
        } else {
            order.to_vec()
        };
        let distinct: BTreeSet<&str> = order.iter().copied().collect();
        let expected: BTreeSet<&str> = self.event.names().collect();
        if distinct != expected || distinct.len() != order.len() {
            return Err(ProbNetError::Event(format!(
                "chain rule order {order:?} is not a permutation of the events of {self}"
            )));
        }

        let mut factors = Vec::with_capacity(order.len());
        for (i, name) in order.iter().enumerate() {
            let head = self
                .event
                .get(name)
                .cloned()
                .ok_or_else(|| ProbNetError::Event(format!("unknown event '{name}'")))?;
            let mut condition = self.condition.clone();
            for later in &order[i + 1..] {
                if let Some(e) = self.event.get(later) {
                    condition.insert(e.clone())?;
                }
            }
            factors.push(Self::single(head, condition)?);
        }
        Ok(factors)
    }
}

impl fmt::Display for ConditionalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition.is_empty() {
            write!(f, "P({})", self.event)
        } else {
            write!(f, "P({} | {})", self.event, self.condition)
        }
    }
}
