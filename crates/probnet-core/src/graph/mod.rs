//! # Graph
//!
//! Directed graphs whose acceptance rules are fixed by a type-level
//! [`GraphPolicy`] and whose lookup structures are picked from the property
//! types through [`AutoIndex`].

mod directed;
mod index;
mod policy;

pub use directed::{DirectedGraph, EdgeId, EdgeRecord, Graph, PathStep, VertexId};
pub use index::{AutoIndex, HashIndex, LinearIndex, OrderedIndex, PropertyIndex};
pub use policy::{
    DagPolicy, GraphPolicy, LenientDagPolicy, MultiGraphPolicy, Policy, SimpleGraphPolicy,
};
