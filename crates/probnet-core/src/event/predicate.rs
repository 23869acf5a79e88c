//! # Event
//!
//! A predicate over one named variable: `name op value`.

use crate::error::{ProbNetError, Result};
use crate::variant::{Interval, MatchOp, ScalarKind, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named comparison against a value. Placeholders carry no value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Event {
    name: String,
    value: Option<Variant>,
    op: MatchOp,
}

impl Event {
    pub fn new(name: impl Into<String>, value: impl Into<Variant>, op: MatchOp) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            op,
        }
    }

    /// `name = value`
    pub fn equals(name: impl Into<String>, value: impl Into<Variant>) -> Self {
        Self::new(name, value, MatchOp::Equal)
    }

    /// `name in interval`
    pub fn element_of(name: impl Into<String>, interval: impl Into<Variant>) -> Self {
        Self::new(name, interval, MatchOp::ElementOf)
    }

    /// A name with no value. Matches nothing.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            op: MatchOp::Placeholder,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Variant> {
        self.value.as_ref()
    }

    pub fn op(&self) -> MatchOp {
        self.op
    }

    pub fn is_placeholder(&self) -> bool {
        self.op == MatchOp::Placeholder
    }

    /// Whether an observed event satisfies this one: same name, and this
    /// event's op holds between the observed value and this value.
    pub fn matches(&self, observed: &Event) -> bool {
        self.name == observed.name
            && observed
                .value
                .as_ref()
                .is_some_and(|value| self.matches_value(value))
    }

    /// Whether `value` satisfies this event's op and value.
    pub fn matches_value(&self, value: &Variant) -> bool {
        self.value
            .as_ref()
            .is_some_and(|own| self.op.apply(value, own))
    }

    /// Same name with a different value or op.
    pub fn conflicts(&self, other: &Event) -> bool {
        self.name == other.name && (self.value != other.value || self.op != other.op)
    }

    /// The set of floats this event selects, as an interval.
    ///
    /// Fails for events whose value is not a float or a float interval, and
    /// for ops that do not describe a single interval.
    pub fn to_float_interval(&self) -> Result<Interval<f64>> {
        let wrong = || {
            ProbNetError::Event(format!(
                "event '{self}' does not describe an interval of floats"
            ))
        };
        let value = self.value.as_ref().ok_or_else(wrong)?;
        if let Variant::Interval(_) = value {
            return match self.op {
                MatchOp::ElementOf => value.interval::<f64>().cloned().map_err(|_| wrong()),
                _ => Err(wrong()),
            };
        }
        let x = value.get::<f64>().map_err(|_| wrong())?;
        match self.op {
            MatchOp::Equal => Ok(Interval::closed(x, x)),
            MatchOp::Less => Ok(Interval::less_than(x)),
            MatchOp::LessEqual => Ok(Interval::at_most(x)),
            MatchOp::Greater => Ok(Interval::greater_than(x)),
            MatchOp::GreaterEqual => Ok(Interval::at_least(x)),
            MatchOp::NotEqual | MatchOp::ElementOf | MatchOp::Placeholder => Err(wrong()),
        }
    }

    /// Parse `name<op>value`, scanning the value as `kind`. A value in
    /// bracket notation after ` in ` becomes an interval.
    pub fn parse(text: &str, kind: ScalarKind) -> Result<Event> {
        let (name, op, value) = MatchOp::split_expression(text).ok_or_else(|| {
            ProbNetError::Event(format!("'{text}' has no comparison operator"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ProbNetError::Event(format!("'{text}' has no variable name")));
        }
        let value = value.trim();
        let value = match op {
            MatchOp::ElementOf => Variant::scan_interval(value, kind)?,
            _ => Variant::scan(value, kind)?,
        };
        Ok(Self::new(name, value, op))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}{}{}", self.name, self.op, value),
            None => write!(f, "{}?", self.name),
        }
    }
}
