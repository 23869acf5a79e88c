//! # Error Types
//!
//! One error enum for the whole core. Every fallible operation returns
//! `Result<T, ProbNetError>`; the core never panics on bad input.
//!
//! Graph operations are the only place where a failure may instead be
//! reported as a status value, depending on the graph policy
//! (see [`crate::graph::GraphPolicy::THROW_ON_ERROR`]).

use crate::variant::{ScalarKind, Tag};
use std::fmt;
use thiserror::Error;

/// Errors that can occur anywhere in the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbNetError {
    /// A variant payload was requested at the wrong tag.
    #[error("cannot cast a {from} variant to {to}")]
    Cast { from: Tag, to: Tag },

    /// The literal is not part of the boolean lexicon.
    #[error("'{literal}' is not a boolean literal")]
    BoolScan { literal: String },

    /// A string could not be scanned as the requested scalar kind.
    #[error("cannot scan '{literal}' as {expected}")]
    Scan {
        literal: String,
        expected: ScalarKind,
    },

    /// A bounded integer left `[lo, hi]` under the rejecting resolver,
    /// or a conversion between two ranges is not defined.
    #[error("value {value} is outside the bounded range [{lo}, {hi}]")]
    OutOfRange { lo: i128, hi: i128, value: i128 },

    /// A vertex is missing, or already present where duplicates are refused.
    #[error("vertex existence: {0}")]
    VertexExistence(String),

    /// An edge is missing.
    #[error("edge existence: {0}")]
    EdgeExistence(String),

    /// An edge between the same ordered pair already exists.
    #[error("parallel edge: {0}")]
    ParallelEdge(String),

    /// The operation would close a directed cycle.
    #[error("cycle: {0}")]
    Cycle(String),

    /// Two events in one conjunction share a name with incompatible value or op.
    #[error("conflicting events '{existing}' and '{incoming}'")]
    EventListConflict { existing: String, incoming: String },

    /// An event cannot supply the requested shape of value.
    #[error("event error: {0}")]
    Event(String),

    /// A value lies outside the domain a range or function accepts.
    #[error("{kind} violated by value {value}")]
    EventRange { kind: EventRangeKind, value: String },

    /// A probability function is not usable for the request.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// Malformed tabular input.
    #[error("table error: {0}")]
    Table(String),
}

/// Which domain rule an [`ProbNetError::EventRange`] failure broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventRangeKind {
    /// Exponential samples must be non-negative.
    ExponentialRange,
    /// A value's tag disagrees with the members of a range.
    TypeMismatch,
    /// Set extension was attempted on a continuous range.
    ContinuousRange,
    /// An integral range is too large to enumerate.
    EnumerationLimit,
    /// A training weight is negative or not finite.
    Weight,
}

impl fmt::Display for EventRangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExponentialRange => "exponential range",
            Self::TypeMismatch => "type agreement",
            Self::ContinuousRange => "continuous range",
            Self::EnumerationLimit => "enumeration limit",
            Self::Weight => "sample weight",
        };
        f.write_str(name)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProbNetError>;

impl ProbNetError {
    /// Shorthand for a [`ProbNetError::Distribution`] failure.
    pub fn distribution(message: impl Into<String>) -> Self {
        Self::Distribution(message.into())
    }

    /// Shorthand for an [`ProbNetError::EventRange`] failure.
    pub fn event_range(kind: EventRangeKind, value: impl fmt::Display) -> Self {
        Self::EventRange {
            kind,
            value: value.to_string(),
        }
    }
}
