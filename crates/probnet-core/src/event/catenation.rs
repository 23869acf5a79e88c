//! # Event Catenation
//!
//! A conjunction of events keyed by variable name. A name appears at most
//! once; inserting a second, different event under the same name fails.

use super::predicate::Event;
use crate::error::{ProbNetError, Result};
use crate::primitives::MAX_ENUMERATED_ASSIGNMENTS;
use crate::range::ValueRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitAnd;

/// Ordered-by-name conjunction of events.
///
/// Catenations compare as the sorted sequence of their events.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventCatenation {
    events: BTreeMap<String, Event>,
}

impl EventCatenation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events<I: IntoIterator<Item = Event>>(events: I) -> Result<Self> {
        let mut catenation = Self::new();
        for event in events {
            catenation.insert(event)?;
        }
        Ok(catenation)
    }

    /// Add an event. Re-adding an identical event is a no-op.
    pub fn insert(&mut self, event: Event) -> Result<()> {
        if let Some(existing) = self.events.get(event.name()) {
            if existing.conflicts(&event) {
                return Err(ProbNetError::EventListConflict {
                    existing: existing.to_string(),
                    incoming: event.to_string(),
                });
            }
            return Ok(());
        }
        self.events.insert(event.name().to_owned(), event);
        Ok(())
    }

    /// Put a placeholder for `name` unless the name already has an event.
    pub(crate) fn fill_placeholder(&mut self, name: &str) {
        self.events
            .entry(name.to_owned())
            .or_insert_with(|| Event::placeholder(name));
    }

    /// Builder form of [`EventCatenation::insert`].
    pub fn and(mut self, event: Event) -> Result<Self> {
        self.insert(event)?;
        Ok(self)
    }

    /// Conjunction of both sides; fails on the first conflicting name.
    pub fn merged(&self, other: &EventCatenation) -> Result<Self> {
        let mut merged = self.clone();
        for event in other.iter() {
            merged.insert(event.clone())?;
        }
        Ok(merged)
    }

    pub fn get(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Event> {
        self.events.remove(name)
    }

    /// Keep only the events whose names satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.events.retain(|name, _| keep(name));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every equality assignment over the given enumerated ranges, in
    /// range order. No variables yield one empty catenation.
    pub fn cross_product<'r, I>(variables: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = (&'r str, &'r ValueRange)>,
    {
        let mut combos = vec![Self::new()];
        for (name, range) in variables {
            if range.is_continuous() || range.is_empty() {
                return Err(ProbNetError::distribution(format!(
                    "range of '{name}' cannot be enumerated"
                )));
            }
            let total = (combos.len() as u64).saturating_mul(range.len() as u64);
            if total > MAX_ENUMERATED_ASSIGNMENTS {
                return Err(ProbNetError::distribution(format!(
                    "{total} assignments exceed the enumeration limit"
                )));
            }
            let mut next = Vec::with_capacity(total as usize);
            for combo in &combos {
                for event in range.make_event_collection(name) {
                    next.push(combo.clone().and(event)?);
                }
            }
            combos = next;
        }
        Ok(combos)
    }

    /// Whether every event here is satisfied by the observed event of the
    /// same name in `observed`.
    pub fn matches(&self, observed: &EventCatenation) -> bool {
        self.events.values().all(|pattern| {
            observed
                .get(pattern.name())
                .is_some_and(|seen| pattern.matches(seen))
        })
    }
}

impl<'a> IntoIterator for &'a EventCatenation {
    type Item = &'a Event;
    type IntoIter = std::collections::btree_map::Values<'a, String, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.values()
    }
}

impl BitAnd<Event> for Event {
    type Output = Result<EventCatenation>;

    fn bitand(self, rhs: Event) -> Self::Output {
        EventCatenation::from_events([self, rhs])
    }
}

impl BitAnd<Event> for EventCatenation {
    type Output = Result<EventCatenation>;

    fn bitand(self, rhs: Event) -> Self::Output {
        self.and(rhs)
    }
}

impl fmt::Display for EventCatenation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::MatchOp;

    #[test]
    fn conflicting_insert_fails() {
        let mut cat = EventCatenation::new();
        cat.insert(Event::equals("Cloud", "yes")).expect("first");
        cat.insert(Event::equals("Cloud", "yes"))
            .expect("identical is a no-op");
        let err = cat
            .insert(Event::equals("Cloud", "no"))
            .expect_err("conflict");
        assert_eq!(
            err,
            ProbNetError::EventListConflict {
                existing: "Cloud=yes".to_owned(),
                incoming: "Cloud=no".to_owned(),
            }
        );
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn ordered_by_name() {
        let cat = (Event::equals("Rain", "none") & Event::equals("Cloud", "no")).expect("and");
        let names: Vec<&str> = cat.names().collect();
        assert_eq!(names, vec!["Cloud", "Rain"]);
        assert_eq!(cat.to_string(), "Cloud=no, Rain=none");
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = EventCatenation::from_events([Event::equals("A", 1_i64), Event::equals("B", 2_i64)])
            .expect("a");
        let b = EventCatenation::from_events([Event::equals("B", 2_i64), Event::equals("A", 1_i64)])
            .expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn pattern_matching() {
        let pattern = EventCatenation::from_events([
            Event::new("Sprinkler", 2_i64, MatchOp::GreaterEqual),
            Event::equals("Cloud", "yes"),
        ])
        .expect("pattern");
        let row = EventCatenation::from_events([
            Event::equals("Sprinkler", 3_i64),
            Event::equals("Cloud", "yes"),
            Event::equals("Rain", "none"),
        ])
        .expect("row");
        assert!(pattern.matches(&row));

        let partial = EventCatenation::from_events([Event::equals("Sprinkler", 3_i64)])
            .expect("partial");
        assert!(!pattern.matches(&partial));
    }

    #[test]
    fn cross_product_enumerates_assignments() {
        let cloud = ValueRange::from_values(["yes", "no"]).expect("cloud");
        let rain = ValueRange::from_values(["none", "light", "heavy"]).expect("rain");
        let combos =
            EventCatenation::cross_product([("Cloud", &cloud), ("Rain", &rain)]).expect("combos");
        assert_eq!(combos.len(), 6);
        assert!(combos.iter().all(|c| c.len() == 2));

        let none = EventCatenation::cross_product(Vec::<(&str, &ValueRange)>::new())
            .expect("empty product");
        assert_eq!(none, vec![EventCatenation::new()]);

        let empty = ValueRange::new();
        assert!(EventCatenation::cross_product([("X", &empty)]).is_err());
    }

    #[test]
    fn merged_detects_conflicts() {
        let left = EventCatenation::from_events([Event::equals("A", 1_i64)]).expect("left");
        let right = EventCatenation::from_events([Event::equals("A", 2_i64)]).expect("right");
        assert!(left.merged(&right).is_err());
    }

    #[test]
    fn fill_placeholder_keeps_existing_events() {
        let mut cat = EventCatenation::from_events([Event::equals("A", 1_i64)]).expect("cat");
        cat.fill_placeholder("A");
        cat.fill_placeholder("B");
        assert_eq!(cat.get("A"), Some(&Event::equals("A", 1_i64)));
        assert!(cat.get("B").is_some_and(Event::is_placeholder));
        assert_eq!(cat.len(), 2);
    }
}
