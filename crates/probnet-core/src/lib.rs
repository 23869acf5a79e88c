//! # probnet-core
//!
//! Bayesian networks over typed events - THE LOGIC.
//!
//! The crate is layered bottom-up:
//! - `bounded`: integers constrained to a compile-time interval
//! - `variant`: tagged scalar and interval values, comparisons, scanning
//! - `range`: the values a variable may take
//! - `graph`: directed graphs with type-level acceptance policies
//! - `event`: events, conjunctions and conditional events
//! - `distribution`: probability functions trained from weighted samples
//! - `network`: Bayesian networks, Bayes-Ball and exact inference
//! - `table`: typed rows consumed by network training
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no file I/O
//! - Deterministic: ordered collections everywhere iteration is observable
//! - Single-threaded: mutation needs `&mut`, reads may be shared
//! - Every fallible operation returns [`Result`]

// =============================================================================
// MODULES
// =============================================================================

pub mod bounded;
pub mod distribution;
pub mod error;
pub mod event;
pub mod graph;
pub mod network;
pub mod primitives;
pub mod range;
pub mod table;
pub mod variant;

// =============================================================================
// RE-EXPORTS: Errors
// =============================================================================

pub use error::{EventRangeKind, ProbNetError, Result};

// =============================================================================
// RE-EXPORTS: Values
// =============================================================================

pub use bounded::{
    BoundedInt, CircularScale, Degrees, MarkInvalid, Modulo, Reject, Scale, SignedDegrees,
};
pub use range::{ContinuousKind, ValueRange};
pub use variant::{Interval, MatchOp, ScalarKind, Tag, Variant};

// =============================================================================
// RE-EXPORTS: Graphs, Events, Distributions
// =============================================================================

pub use distribution::{
    DiscreteDistribution, Distribution, ExponentialDistribution, GaussianDistribution,
    ProbabilityFunction, Sample, UniformDistribution,
};
pub use event::{ConditionalEvent, Event, EventCatenation};
pub use graph::{DagPolicy, DirectedGraph, EdgeId, Graph, GraphPolicy, VertexId};

// =============================================================================
// RE-EXPORTS: Networks and Tables
// =============================================================================

pub use network::{BayesNetwork, BayesNode, Relevance};
pub use table::{ColumnType, Table, TableLayout};
