//! # Graph Policies
//!
//! Compile-time switches that decide what a [`DirectedGraph`] accepts and
//! how it reports refusals.
//!
//! [`DirectedGraph`]: super::DirectedGraph

/// Behavioural switches of a directed graph, fixed at the type level.
pub trait GraphPolicy {
    /// Several vertices may carry equal properties.
    const ALLOW_MULTIPLE_VERTICES: bool;
    /// Several edges may join the same ordered pair of vertices.
    const ALLOW_PARALLEL_EDGES: bool;
    /// Directed cycles (self-loops included) are accepted.
    const ALLOW_CYCLES: bool;
    /// Refusals surface as `Err`; otherwise they are logged and reported
    /// through `Ok(None)` / `Ok(false)`.
    const THROW_ON_ERROR: bool;
    /// A parallel edge replaces the existing edge's property instead of
    /// being refused. Only consulted when parallel edges are disallowed.
    const OVERWRITE_EDGE_PROPERTY: bool;
}

/// Generic policy carrying every switch as a const parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Policy<
    const MULTIPLE_VERTICES: bool,
    const PARALLEL_EDGES: bool,
    const CYCLES: bool,
    const THROW: bool,
    const OVERWRITE: bool,
>;

impl<const MV: bool, const PE: bool, const CY: bool, const TH: bool, const OW: bool> GraphPolicy
    for Policy<MV, PE, CY, TH, OW>
{
    const ALLOW_MULTIPLE_VERTICES: bool = MV;
    const ALLOW_PARALLEL_EDGES: bool = PE;
    const ALLOW_CYCLES: bool = CY;
    const THROW_ON_ERROR: bool = TH;
    const OVERWRITE_EDGE_PROPERTY: bool = OW;
}

/// Unique vertices, no parallel edges, acyclic, refusals are errors.
pub type DagPolicy = Policy<false, false, false, true, false>;

/// Like [`DagPolicy`] but refusals are status values and a repeated edge
/// overwrites the existing property.
pub type LenientDagPolicy = Policy<false, false, false, false, true>;

/// Unique vertices and edges, cycles allowed, refusals are errors.
pub type SimpleGraphPolicy = Policy<false, false, true, true, false>;

/// Anything goes.
pub type MultiGraphPolicy = Policy<true, true, true, false, false>;

#[cfg(test)]
mod tests {
    use super::*;

    fn switches<P: GraphPolicy>() -> [bool; 5] {
        [
            P::ALLOW_MULTIPLE_VERTICES,
            P::ALLOW_PARALLEL_EDGES,
            P::ALLOW_CYCLES,
            P::THROW_ON_ERROR,
            P::OVERWRITE_EDGE_PROPERTY,
        ]
    }

    #[test]
    fn aliases_expose_their_switches() {
        assert_eq!(switches::<DagPolicy>(), [false, false, false, true, false]);
        assert_eq!(
            switches::<LenientDagPolicy>(),
            [false, false, false, false, true]
        );
        assert_eq!(switches::<MultiGraphPolicy>(), [true, true, true, false, false]);
    }
}
