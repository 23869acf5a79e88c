//! # Function Domain
//!
//! The value ranges a probability function is defined over: one range per
//! event name and one per condition name.

use crate::error::{ProbNetError, Result};
use crate::event::{ConditionalEvent, Event, EventCatenation};
use crate::range::ValueRange;
use crate::variant::{MatchOp, Variant};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    events: BTreeMap<String, ValueRange>,
    conditions: BTreeMap<String, ValueRange>,
}

impl Domain {
    /// A domain over the single event `name`.
    pub fn for_event(name: impl Into<String>, range: ValueRange) -> Self {
        let mut domain = Self::default();
        domain.events.insert(name.into(), range);
        domain
    }

    pub fn event_ranges(&self) -> &BTreeMap<String, ValueRange> {
        &self.events
    }

    pub fn condition_ranges(&self) -> &BTreeMap<String, ValueRange> {
        &self.conditions
    }

    pub fn event_range(&self, name: &str) -> Option<&ValueRange> {
        self.events.get(name)
    }

    pub fn condition_range(&self, name: &str) -> Option<&ValueRange> {
        self.conditions.get(name)
    }

    /// The only event name, for single-event functions.
    pub fn event_name(&self) -> Result<&str> {
        let mut names = self.events.keys();
        match (names.next(), names.next()) {
            (Some(name), None) => Ok(name),
            _ => Err(ProbNetError::distribution(
                "function must be defined over exactly one event",
            )),
        }
    }

    pub fn condition_names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    pub fn set_event_range(&mut self, name: impl Into<String>, range: ValueRange) {
        self.events.insert(name.into(), range);
    }

    pub fn set_condition_range(&mut self, name: impl Into<String>, range: ValueRange) {
        self.conditions.insert(name.into(), range);
    }

    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    /// Record an observed event value, growing its range.
    pub fn observe_event(&mut self, name: &str, value: &Variant) -> Result<()> {
        observe(self.events.entry(name.to_owned()).or_default(), value)
    }

    /// Record an observed condition value, growing its range.
    pub fn observe_condition(&mut self, name: &str, value: &Variant) -> Result<()> {
        observe(self.conditions.entry(name.to_owned()).or_default(), value)
    }

    /// Reject queries the function cannot answer: unknown event or
    /// condition names, or values whose tag disagrees with the range.
    pub fn check_possible(&self, query: &ConditionalEvent) -> Result<()> {
        for event in query.event() {
            let range = self.events.get(event.name()).ok_or_else(|| {
                ProbNetError::distribution(format!("unknown event name '{}'", event.name()))
            })?;
            check_tag(range, event)?;
        }
        for condition in query.condition() {
            let range = self.conditions.get(condition.name()).ok_or_else(|| {
                ProbNetError::distribution(format!(
                    "unknown condition name '{}'",
                    condition.name()
                ))
            })?;
            check_tag(range, condition)?;
        }
        Ok(())
    }

    /// The condition block a query addresses: exactly one equality event
    /// per condition name of this domain.
    pub fn parameter_key(&self, query: &ConditionalEvent) -> Result<EventCatenation> {
        let projected = query.filter_conditions(self.condition_names());
        for condition in projected.condition() {
            if condition.is_placeholder() {
                return Err(ProbNetError::distribution(format!(
                    "condition '{}' is not specified",
                    condition.name()
                )));
            }
            if condition.op() != MatchOp::Equal {
                return Err(ProbNetError::distribution(format!(
                    "condition '{condition}' must be an equality"
                )));
            }
        }
        Ok(projected.condition().clone())
    }

    /// The single event of a query.
    pub fn single_event<'q>(&self, query: &'q ConditionalEvent) -> Result<&'q Event> {
        let mut events = query.event().iter();
        match (events.next(), events.next()) {
            (Some(event), None) => Ok(event),
            _ => Err(ProbNetError::distribution(format!(
                "{query} must have exactly one event"
            ))),
        }
    }
}

fn observe(range: &mut ValueRange, value: &Variant) -> Result<()> {
    if range.is_continuous() {
        if let Some(x) = value.as_f64() {
            range.extend_bounds(x);
        }
        return Ok(());
    }
    if !range.valid_value(value) {
        range.add(value.clone())?;
    }
    Ok(())
}

fn check_tag(range: &ValueRange, event: &Event) -> Result<()> {
    match event.value() {
        Some(value) if !range.accepts_tag(value) => Err(ProbNetError::distribution(format!(
            "value of '{event}' does not match the range {range}"
        ))),
        _ => Ok(()),
    }
}
