//! # Directed Graph Engine
//!
//! Policy-driven directed graph with typed vertex and edge properties.
//!
//! Vertices and edges are addressed by stable ids that are never reused.
//! All adjacency is kept in `BTreeMap`/`BTreeSet` so iteration order is
//! deterministic; the property indexes only answer lookups.

use super::index::{AutoIndex, PropertyIndex};
use super::policy::{DagPolicy, GraphPolicy};
use crate::error::{ProbNetError, Result};
use crate::primitives::MAX_ENUMERATED_PATHS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

// =============================================================================
// IDS AND RECORDS
// =============================================================================

/// Identifier of a vertex within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

/// Identifier of an edge within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A stored edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord<E> {
    pub source: VertexId,
    pub target: VertexId,
    pub property: E,
}

/// One hop of a path: `source --edge--> target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathStep {
    pub source: VertexId,
    pub edge: EdgeId,
    pub target: VertexId,
}

// =============================================================================
// GRAPH
// =============================================================================

/// Directed graph with vertex properties `V`, edge properties `E`, policy
/// `P` and property indexes `VI` / `EI`.
///
/// Most callers use the [`Graph`] alias, which picks the indexes from the
/// property types.
#[derive(Debug, Clone)]
pub struct DirectedGraph<V, E, P, VI, EI> {
    vertices: BTreeMap<VertexId, V>,
    edges: BTreeMap<EdgeId, EdgeRecord<E>>,
    outgoing: BTreeMap<VertexId, BTreeSet<EdgeId>>,
    incoming: BTreeMap<VertexId, BTreeSet<EdgeId>>,
    vertex_index: VI,
    edge_index: EI,
    next_vertex: u64,
    next_edge: u64,
    _policy: PhantomData<P>,
}

/// A directed graph whose property indexes follow [`AutoIndex`].
pub type Graph<V, E, P = DagPolicy> = DirectedGraph<
    V,
    E,
    P,
    <V as AutoIndex>::Index<VertexId>,
    <E as AutoIndex>::Index<EdgeId>,
>;

impl<V, E, P, VI: Default, EI: Default> Default for DirectedGraph<V, E, P, VI, EI> {
    fn default() -> Self {
        Self {
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            outgoing: BTreeMap::new(),
            incoming: BTreeMap::new(),
            vertex_index: VI::default(),
            edge_index: EI::default(),
            next_vertex: 0,
            next_edge: 0,
            _policy: PhantomData,
        }
    }
}

impl<V, E, P, VI, EI> DirectedGraph<V, E, P, VI, EI>
where
    V: Clone + fmt::Debug,
    E: Clone + fmt::Debug,
    P: GraphPolicy,
    VI: PropertyIndex<V, VertexId>,
    EI: PropertyIndex<E, EdgeId>,
{
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the policy to a refused operation.
    fn refuse<T>(error: ProbNetError) -> Result<Option<T>> {
        if P::THROW_ON_ERROR {
            return Err(error);
        }
        debug!(%error, "graph operation refused");
        Ok(None)
    }

    fn refuse_status(error: ProbNetError) -> Result<bool> {
        Self::refuse::<()>(error).map(|_| false)
    }

    fn missing_vertex(id: VertexId) -> ProbNetError {
        ProbNetError::VertexExistence(format!("vertex {id} does not exist"))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeRecord<E>> {
        self.edges.get(&id)
    }

    /// All vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.vertices.iter().map(|(id, v)| (*id, v))
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// All edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord<E>)> {
        self.edges.iter().map(|(id, e)| (*id, e))
    }

    pub fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.outgoing.get(&vertex).into_iter().flatten().copied()
    }

    pub fn in_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incoming.get(&vertex).into_iter().flatten().copied()
    }

    /// Distinct targets of outgoing edges, ascending.
    pub fn children(&self, vertex: VertexId) -> Vec<VertexId> {
        let set: BTreeSet<VertexId> = self
            .out_edges(vertex)
            .filter_map(|e| self.edges.get(&e).map(|r| r.target))
            .collect();
        set.into_iter().collect()
    }

    /// Distinct sources of incoming edges, ascending.
    pub fn parents(&self, vertex: VertexId) -> Vec<VertexId> {
        let set: BTreeSet<VertexId> = self
            .in_edges(vertex)
            .filter_map(|e| self.edges.get(&e).map(|r| r.source))
            .collect();
        set.into_iter().collect()
    }

    /// Edges from `source` to `target`, ascending.
    pub fn edges_between(&self, source: VertexId, target: VertexId) -> Vec<EdgeId> {
        self.out_edges(source)
            .filter(|e| self.edges.get(e).is_some_and(|r| r.target == target))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Lookup through the property indexes
    // -------------------------------------------------------------------------

    /// Lowest-id vertex carrying `property`.
    pub fn find_vertex(&self, property: &V) -> Option<VertexId> {
        self.vertex_index.find(property).first().copied()
    }

    pub fn find_vertices(&self, property: &V) -> Vec<VertexId> {
        self.vertex_index.find(property)
    }

    pub fn find_edges(&self, property: &E) -> Vec<EdgeId> {
        self.edge_index.find(property)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Insert a vertex. A duplicate property is refused unless the policy
    /// allows multiple vertices.
    pub fn add_vertex(&mut self, property: V) -> Result<Option<VertexId>> {
        if !P::ALLOW_MULTIPLE_VERTICES && self.vertex_index.contains(&property) {
            return Self::refuse(ProbNetError::VertexExistence(format!(
                "vertex {property:?} already exists"
            )));
        }
        let id = VertexId(self.next_vertex);
        self.next_vertex = self.next_vertex.saturating_add(1);
        self.vertex_index.insert(&property, id);
        self.vertices.insert(id, property);
        Ok(Some(id))
    }

    /// Remove a vertex and every edge touching it.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<bool> {
        let Some(property) = self.vertices.remove(&id) else {
            return Self::refuse_status(Self::missing_vertex(id));
        };
        let touching: Vec<EdgeId> = self.out_edges(id).chain(self.in_edges(id)).collect();
        for edge in touching {
            self.detach_edge(edge);
        }
        self.outgoing.remove(&id);
        self.incoming.remove(&id);
        self.vertex_index.remove(&property, id);
        Ok(true)
    }

    /// Insert an edge `source -> target`.
    ///
    /// Refused when an endpoint is missing, when it would close a cycle
    /// under an acyclic policy, or when it duplicates an existing pair under
    /// a policy without parallel edges and without overwriting. With
    /// overwriting, the existing edge takes the new property and its id is
    /// returned.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        property: E,
    ) -> Result<Option<EdgeId>> {
        for endpoint in [source, target] {
            if !self.vertices.contains_key(&endpoint) {
                return Self::refuse(Self::missing_vertex(endpoint));
            }
        }

        if !P::ALLOW_PARALLEL_EDGES
            && let Some(existing) = self.edges_between(source, target).first().copied()
        {
            if P::OVERWRITE_EDGE_PROPERTY {
                self.set_edge_property(existing, property);
                return Ok(Some(existing));
            }
            return Self::refuse(ProbNetError::ParallelEdge(format!(
                "edge {source} -> {target} already exists"
            )));
        }

        let id = EdgeId(self.next_edge);
        self.attach_edge(
            id,
            EdgeRecord {
                source,
                target,
                property,
            },
        );

        // Tentative insertion: roll back if the new edge closes a cycle.
        if !P::ALLOW_CYCLES && self.cycle_from(source, &mut BTreeSet::new()) {
            self.detach_edge(id);
            return Self::refuse(ProbNetError::Cycle(format!(
                "edge {source} -> {target} closes a directed cycle"
            )));
        }

        self.next_edge = self.next_edge.saturating_add(1);
        Ok(Some(id))
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<bool> {
        if self.detach_edge(id).is_none() {
            return Self::refuse_status(ProbNetError::EdgeExistence(format!(
                "edge {id} does not exist"
            )));
        }
        Ok(true)
    }

    fn set_edge_property(&mut self, id: EdgeId, property: E) {
        if let Some(record) = self.edges.get_mut(&id) {
            self.edge_index.remove(&record.property, id);
            self.edge_index.insert(&property, id);
            record.property = property;
        }
    }

    fn attach_edge(&mut self, id: EdgeId, record: EdgeRecord<E>) {
        self.outgoing.entry(record.source).or_default().insert(id);
        self.incoming.entry(record.target).or_default().insert(id);
        self.edge_index.insert(&record.property, id);
        self.edges.insert(id, record);
    }

    fn detach_edge(&mut self, id: EdgeId) -> Option<EdgeRecord<E>> {
        let record = self.edges.remove(&id)?;
        if let Some(out) = self.outgoing.get_mut(&record.source) {
            out.remove(&id);
        }
        if let Some(inc) = self.incoming.get_mut(&record.target) {
            inc.remove(&id);
        }
        self.edge_index.remove(&record.property, id);
        Some(record)
    }

    // -------------------------------------------------------------------------
    // Algorithms
    // -------------------------------------------------------------------------

    /// Depth-first search from `start` tracking the active stack. Vertices in
    /// `finished` are known to be cycle-free and are skipped.
    fn cycle_from(&self, start: VertexId, finished: &mut BTreeSet<VertexId>) -> bool {
        if finished.contains(&start) {
            return false;
        }
        let mut on_stack = BTreeSet::from([start]);
        let mut frames = vec![(start, self.children(start))];

        loop {
            let Some(frame) = frames.last_mut() else {
                return false;
            };
            let vertex = frame.0;
            match frame.1.pop() {
                Some(next) => {
                    if on_stack.contains(&next) {
                        return true;
                    }
                    if !finished.contains(&next) {
                        on_stack.insert(next);
                        let pending = self.children(next);
                        frames.push((next, pending));
                    }
                }
                None => {
                    on_stack.remove(&vertex);
                    finished.insert(vertex);
                    frames.pop();
                }
            }
        }
    }

    /// Whether any directed cycle exists.
    pub fn has_cycle(&self) -> bool {
        let mut finished = BTreeSet::new();
        self.vertices
            .keys()
            .any(|&v| self.cycle_from(v, &mut finished))
    }

    /// Kahn's algorithm over a zero-in-degree frontier. Ties resolve by
    /// ascending id.
    pub fn topological_order(&self) -> Result<Vec<VertexId>> {
        let mut in_degree: BTreeMap<VertexId, usize> = self
            .vertices
            .keys()
            .map(|&v| (v, self.incoming.get(&v).map_or(0, BTreeSet::len)))
            .collect();
        let mut queue: VecDeque<VertexId> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(v, _)| *v)
            .collect();
        let mut order = Vec::with_capacity(self.vertices.len());

        while let Some(vertex) = queue.pop_front() {
            order.push(vertex);
            for edge in self.out_edges(vertex) {
                let Some(record) = self.edges.get(&edge) else {
                    continue;
                };
                if let Some(d) = in_degree.get_mut(&record.target) {
                    *d = d.saturating_sub(1);
                    if *d == 0 {
                        queue.push_back(record.target);
                    }
                }
            }
        }

        if order.len() != self.vertices.len() {
            return Err(ProbNetError::Cycle(
                "graph has no topological order".to_owned(),
            ));
        }
        Ok(order)
    }

    /// Every simple path from `source` to `target` as edge steps.
    ///
    /// Paths are found by depth-first search in edge-id order with a
    /// visited set scoped to the active path. A vertex has no simple path
    /// to itself. At most `MAX_ENUMERATED_PATHS` paths are returned.
    pub fn get_all_paths(
        &self,
        source: VertexId,
        target: VertexId,
    ) -> Result<Vec<Vec<PathStep>>> {
        for endpoint in [source, target] {
            if !self.vertices.contains_key(&endpoint) {
                return Self::refuse::<()>(Self::missing_vertex(endpoint)).map(|_| Vec::new());
            }
        }
        let mut paths = Vec::new();
        let mut on_path = BTreeSet::from([source]);
        let mut trail = Vec::new();
        self.collect_paths(source, target, &mut on_path, &mut trail, &mut paths);
        if paths.len() >= MAX_ENUMERATED_PATHS {
            debug!(
                %source,
                %target,
                limit = MAX_ENUMERATED_PATHS,
                "path enumeration truncated"
            );
        }
        Ok(paths)
    }

    fn collect_paths(
        &self,
        current: VertexId,
        target: VertexId,
        on_path: &mut BTreeSet<VertexId>,
        trail: &mut Vec<PathStep>,
        paths: &mut Vec<Vec<PathStep>>,
    ) {
        for edge in self.out_edges(current) {
            if paths.len() >= MAX_ENUMERATED_PATHS {
                return;
            }
            let Some(record) = self.edges.get(&edge) else {
                continue;
            };
            let next = record.target;
            if on_path.contains(&next) {
                continue;
            }
            trail.push(PathStep {
                source: current,
                edge,
                target: next,
            });
            if next == target {
                paths.push(trail.clone());
            } else {
                on_path.insert(next);
                self.collect_paths(next, target, on_path, trail, paths);
                on_path.remove(&next);
            }
            trail.pop();
        }
    }

    /// Vertices reachable from `vertex` along edge direction, excluding it.
    pub fn descendants(&self, vertex: VertexId) -> BTreeSet<VertexId> {
        self.reach(vertex, |v| self.children(v))
    }

    /// Vertices from which `vertex` is reachable, excluding it.
    pub fn ancestors(&self, vertex: VertexId) -> BTreeSet<VertexId> {
        self.reach(vertex, |v| self.parents(v))
    }

    fn reach(
        &self,
        start: VertexId,
        step: impl Fn(VertexId) -> Vec<VertexId>,
    ) -> BTreeSet<VertexId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            for next in step(vertex) {
                if next != start && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Split into weakly connected components.
    ///
    /// Components are found by union-find over the undirected mirror of the
    /// edges and rebuilt with their original ids and directed edges,
    /// ordered by their smallest vertex id.
    pub fn get_disconnected_subgraphs(&self) -> Vec<Self> {
        let ids: Vec<VertexId> = self.vertices.keys().copied().collect();
        let position: BTreeMap<VertexId, usize> =
            ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let mut parent: Vec<usize> = (0..ids.len()).collect();

        for record in self.edges.values() {
            let (Some(&a), Some(&b)) = (position.get(&record.source), position.get(&record.target))
            else {
                continue;
            };
            let ra = find_root(&mut parent, a);
            let rb = find_root(&mut parent, b);
            if ra != rb {
                let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
                parent[high] = low;
            }
        }

        let mut groups: BTreeMap<usize, BTreeSet<VertexId>> = BTreeMap::new();
        for (i, id) in ids.iter().enumerate() {
            let root = find_root(&mut parent, i);
            groups.entry(root).or_default().insert(*id);
        }

        groups
            .into_values()
            .map(|members| self.induced(&members))
            .collect()
    }

    /// Subgraph on `members` keeping ids, properties and internal edges.
    fn induced(&self, members: &BTreeSet<VertexId>) -> Self {
        let mut sub = Self {
            next_vertex: self.next_vertex,
            next_edge: self.next_edge,
            ..Self::default()
        };
        for id in members {
            if let Some(property) = self.vertices.get(id) {
                sub.vertex_index.insert(property, *id);
                sub.vertices.insert(*id, property.clone());
            }
        }
        for (id, record) in &self.edges {
            if members.contains(&record.source) && members.contains(&record.target) {
                sub.attach_edge(*id, record.clone());
            }
        }
        sub
    }
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LenientDagPolicy, MultiGraphPolicy, OrderedIndex, SimpleGraphPolicy};

    type Dag = Graph<String, ()>;

    fn vertex<P, VI, EI>(g: &mut DirectedGraph<String, (), P, VI, EI>, name: &str) -> VertexId
    where
        P: GraphPolicy,
        VI: PropertyIndex<String, VertexId>,
        EI: PropertyIndex<(), EdgeId>,
    {
        g.add_vertex(name.to_owned())
            .expect("add vertex")
            .expect("accepted")
    }

    #[test]
    fn duplicate_vertex_refused() {
        let mut g = Dag::new();
        vertex(&mut g, "A");
        let err = g.add_vertex("A".to_owned()).expect_err("duplicate");
        assert!(matches!(err, ProbNetError::VertexExistence(_)));
        assert_eq!(g.vertex_count(), 1);

        let mut multi = Graph::<String, (), MultiGraphPolicy>::new();
        vertex(&mut multi, "A");
        vertex(&mut multi, "A");
        assert_eq!(multi.find_vertices(&"A".to_owned()).len(), 2);
    }

    #[test]
    fn cycle_refused_and_rolled_back() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        let c = vertex(&mut g, "C");
        g.add_edge(a, b, ()).expect("a->b");
        g.add_edge(b, c, ()).expect("b->c");

        let err = g.add_edge(c, a, ()).expect_err("c->a closes a cycle");
        assert!(matches!(err, ProbNetError::Cycle(_)));
        assert_eq!(g.edge_count(), 2);
        assert!(g.edges_between(c, a).is_empty());
        assert!(!g.has_cycle());

        let err = g.add_edge(a, a, ()).expect_err("self-loop");
        assert!(matches!(err, ProbNetError::Cycle(_)));
    }

    #[test]
    fn status_policy_reports_refusal_without_error() {
        let mut g = Graph::<String, (), LenientDagPolicy>::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        assert!(g.add_edge(a, b, ()).expect("a->b").is_some());
        assert_eq!(g.add_edge(b, a, ()).expect("no throw"), None);
        assert_eq!(g.add_vertex("A".to_owned()).expect("no throw"), None);
        assert!(!g.remove_vertex(VertexId(99)).expect("no throw"));
    }

    #[test]
    fn parallel_edges_overwrite_or_fail() {
        let mut lenient: Graph<String, u32, LenientDagPolicy> = Graph::new();
        let a = lenient.add_vertex("A".to_owned()).expect("a").expect("a");
        let b = lenient.add_vertex("B".to_owned()).expect("b").expect("b");
        let first = lenient.add_edge(a, b, 1).expect("first");
        let second = lenient.add_edge(a, b, 2).expect("overwrite");
        assert_eq!(first, second);
        assert_eq!(lenient.edge_count(), 1);
        assert_eq!(lenient.find_edges(&2), first.into_iter().collect::<Vec<_>>());
        assert!(lenient.find_edges(&1).is_empty());

        let mut strict = Dag::new();
        let a = vertex(&mut strict, "A");
        let b = vertex(&mut strict, "B");
        strict.add_edge(a, b, ()).expect("first");
        let err = strict.add_edge(a, b, ()).expect_err("parallel");
        assert!(matches!(err, ProbNetError::ParallelEdge(_)));

        let mut multi = Graph::<String, (), MultiGraphPolicy>::new();
        let a = vertex(&mut multi, "A");
        let b = vertex(&mut multi, "B");
        multi.add_edge(a, b, ()).expect("first");
        multi.add_edge(a, b, ()).expect("second");
        assert_eq!(multi.edges_between(a, b).len(), 2);
    }

    #[test]
    fn cycles_allowed_under_simple_policy() {
        let mut g = Graph::<String, (), SimpleGraphPolicy>::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        g.add_edge(a, b, ()).expect("a->b");
        g.add_edge(b, a, ()).expect("b->a");
        assert!(g.has_cycle());
        assert!(g.topological_order().is_err());
    }

    #[test]
    fn missing_endpoint_refused() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let err = g.add_edge(a, VertexId(42), ()).expect_err("missing");
        assert!(matches!(err, ProbNetError::VertexExistence(_)));
        let err = g.remove_edge(EdgeId(0)).expect_err("missing edge");
        assert!(matches!(err, ProbNetError::EdgeExistence(_)));
    }

    #[test]
    fn remove_vertex_drops_incident_edges() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        let c = vertex(&mut g, "C");
        g.add_edge(a, b, ()).expect("a->b");
        g.add_edge(b, c, ()).expect("b->c");
        assert!(g.remove_vertex(b).expect("remove"));
        assert_eq!(g.edge_count(), 0);
        assert!(g.children(a).is_empty());
        assert!(g.parents(c).is_empty());
        assert_eq!(g.find_vertex(&"B".to_owned()), None);
    }

    #[test]
    fn topological_order_puts_parents_first() {
        let mut g = Dag::new();
        let d = vertex(&mut g, "D");
        let c = vertex(&mut g, "C");
        let b = vertex(&mut g, "B");
        let a = vertex(&mut g, "A");
        g.add_edge(a, b, ()).expect("a->b");
        g.add_edge(b, c, ()).expect("b->c");
        g.add_edge(c, d, ()).expect("c->d");
        assert_eq!(g.topological_order().expect("dag"), vec![a, b, c, d]);
    }

    #[test]
    fn all_simple_paths() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        let c = vertex(&mut g, "C");
        let d = vertex(&mut g, "D");
        let ab = g.add_edge(a, b, ()).expect("ab").expect("ab");
        let bd = g.add_edge(b, d, ()).expect("bd").expect("bd");
        let ac = g.add_edge(a, c, ()).expect("ac").expect("ac");
        let cd = g.add_edge(c, d, ()).expect("cd").expect("cd");
        let bc = g.add_edge(b, c, ()).expect("bc").expect("bc");

        let step = |source, edge, target| PathStep {
            source,
            edge,
            target,
        };
        let paths = g.get_all_paths(a, d).expect("paths");
        assert_eq!(
            paths,
            vec![
                vec![step(a, ab, b), step(b, bd, d)],
                vec![step(a, ab, b), step(b, bc, c), step(c, cd, d)],
                vec![step(a, ac, c), step(c, cd, d)],
            ]
        );
        assert!(g.get_all_paths(d, a).expect("none").is_empty());
        assert!(g.get_all_paths(a, a).expect("self").is_empty());
    }

    #[test]
    fn weakly_connected_components_keep_ids() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        let c = vertex(&mut g, "C");
        let d = vertex(&mut g, "D");
        let e = vertex(&mut g, "E");
        g.add_edge(a, c, ()).expect("a->c");
        g.add_edge(b, c, ()).expect("b->c");
        let de = g.add_edge(d, e, ()).expect("d->e").expect("d->e");

        let parts = g.get_disconnected_subgraphs();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].vertex_ids().collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(parts[0].edge_count(), 2);
        assert_eq!(parts[1].vertex_ids().collect::<Vec<_>>(), vec![d, e]);
        assert_eq!(parts[1].edges_between(d, e), vec![de]);
        assert_eq!(parts[1].find_vertex(&"E".to_owned()), Some(e));
    }

    #[test]
    fn ancestors_and_descendants() {
        let mut g = Dag::new();
        let a = vertex(&mut g, "A");
        let b = vertex(&mut g, "B");
        let c = vertex(&mut g, "C");
        let d = vertex(&mut g, "D");
        g.add_edge(a, b, ()).expect("a->b");
        g.add_edge(b, c, ()).expect("b->c");
        g.add_edge(d, c, ()).expect("d->c");
        assert_eq!(g.ancestors(c), BTreeSet::from([a, b, d]));
        assert_eq!(g.descendants(a), BTreeSet::from([b, c]));
        assert!(g.descendants(c).is_empty());
    }

    #[test]
    fn explicit_ordered_index() {
        type Ordered = DirectedGraph<
            String,
            (),
            DagPolicy,
            OrderedIndex<String, VertexId>,
            OrderedIndex<(), EdgeId>,
        >;
        let mut g = Ordered::new();
        let a = vertex(&mut g, "A");
        assert_eq!(g.find_vertex(&"A".to_owned()), Some(a));
        assert!(g.add_vertex("A".to_owned()).is_err());
    }
}
