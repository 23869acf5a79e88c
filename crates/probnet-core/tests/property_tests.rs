//! # Property-Based Tests
//!
//! Quantified invariants of the core checked with proptest.

use probnet_core::graph::{LenientDagPolicy, MultiGraphPolicy};
use probnet_core::{
    BayesNetwork, ConditionalEvent, DiscreteDistribution, Distribution, Event, EventCatenation,
    Graph, Interval, ValueRange, Variant,
};
use probnet_core::{BoundedInt, Degrees, MarkInvalid, Reject};
use proptest::collection::vec;
use proptest::prelude::*;
use std::cmp::Ordering;

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        any::<bool>().prop_map(Variant::Bool),
        any::<i64>().prop_map(Variant::Int),
        any::<u64>().prop_map(Variant::UInt),
        (-1.0e6..1.0e6_f64).prop_map(Variant::Float),
        "[a-z]{0,4}".prop_map(Variant::Text),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Modulo keeps every value inside the range, congruent to the input.
    #[test]
    fn modulo_lands_in_range(v in -1_000_000i64..1_000_000) {
        let d = Degrees::new(v).expect("modulo never fails");
        prop_assert!((0..=359).contains(&d.get()));
        prop_assert_eq!(d.get(), v.rem_euclid(360));
    }

    /// In-range values survive every resolver unchanged; out-of-range values
    /// become invalid or fail.
    #[test]
    fn resolvers_agree_inside_the_range(v in -50i64..50) {
        let inside = (0..=9).contains(&v);
        let marked = BoundedInt::<i64, 0, 9, MarkInvalid>::new(v).expect("mark");
        let rejected = BoundedInt::<i64, 0, 9, Reject>::new(v);
        prop_assert_eq!(marked.is_valid(), inside);
        prop_assert_eq!(rejected.is_ok(), inside);
        if inside {
            prop_assert_eq!(marked.get(), v);
        }
    }

    /// Sub-interval implies containment of every member.
    #[test]
    fn sub_interval_implies_membership(
        a in -100.0..100.0f64,
        len_a in 0.0..50.0f64,
        c in -100.0..100.0f64,
        len_c in 0.0..50.0f64,
        t in 0.0..=1.0f64,
    ) {
        let inner = Interval::closed_open(a, a + len_a);
        let outer = Interval::closed(c, c + len_c);
        let v = a + t * len_a;
        if inner.is_sub_interval_of(&outer) && inner.contains(&v) {
            prop_assert!(outer.contains(&v));
        }
    }

    /// Variant order is antisymmetric and transitive across tags.
    #[test]
    fn variant_order_is_total(a in variant(), b in variant(), c in variant()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    /// An acyclic policy never accepts a cycle; without parallel edges no
    /// pair carries two edges.
    #[test]
    fn dag_stays_acyclic(edges in vec((0u64..8, 0u64..8), 0..40)) {
        let mut graph: Graph<u64, (), LenientDagPolicy> = Graph::new();
        let ids: Vec<_> = (0..8u64)
            .map(|v| graph.add_vertex(v).expect("vertex").expect("accepted"))
            .collect();
        for (s, t) in edges {
            let _ = graph.add_edge(ids[s as usize], ids[t as usize], ());
        }
        prop_assert!(!graph.has_cycle());
        prop_assert!(graph.topological_order().is_ok());
        for &s in &ids {
            for &t in &ids {
                prop_assert!(graph.edges_between(s, t).len() <= 1);
            }
        }
    }

    /// A multigraph accepts every edge.
    #[test]
    fn multigraph_accepts_everything(edges in vec((0u64..4, 0u64..4), 0..20)) {
        let mut graph: Graph<u64, (), MultiGraphPolicy> = Graph::new();
        let ids: Vec<_> = (0..4u64)
            .map(|v| graph.add_vertex(v).expect("vertex").expect("accepted"))
            .collect();
        for (s, t) in &edges {
            let added = graph.add_edge(ids[*s as usize], ids[*t as usize], ());
            prop_assert!(matches!(added, Ok(Some(_))));
        }
        prop_assert_eq!(graph.edge_count(), edges.len());
    }

    /// Every normalized block sums to one.
    #[test]
    fn normalized_blocks_sum_to_one(
        weights in vec((0u8..3, 0u8..4, 0.0..10.0f64), 1..30)
    ) {
        let mut table = DiscreteDistribution::new("X", ValueRange::new());
        for (condition, value, w) in weights {
            let given = EventCatenation::from_events([Event::equals("C", u64::from(condition))])
                .expect("condition");
            table
                .set(Event::equals("X", u64::from(value)), given, w)
                .expect("set");
        }
        table.normalize().expect("normalize");
        for (_, block) in table.blocks() {
            let sum: f64 = block.values().sum();
            prop_assert!((sum - 1.0).abs() <= 1e-12);
        }
    }

    /// Parents precede their children in the network's node order.
    #[test]
    fn node_order_is_topological(edges in vec((0usize..7, 0usize..7), 0..20)) {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let mut net = BayesNetwork::new();
        for (s, t) in edges {
            let _ = net.add_cause_effect(names[s], names[t]);
        }
        let order = net.breadth_first_node_names().expect("order");
        for (position, name) in order.iter().enumerate() {
            for parent in net.parent_nodes(name).expect("parents") {
                let parent_position = order.iter().position(|n| *n == parent);
                prop_assert!(parent_position.is_some_and(|p| p < position));
            }
        }
    }

    /// The chain-rule product equals the joint.
    #[test]
    fn chain_rule_equals_joint(
        p_a in 0.05..0.95f64,
        p_b in vec(0.05..0.95f64, 2),
        p_c in vec(0.05..0.95f64, 2),
        values in vec(any::<bool>(), 3),
    ) {
        let mut net = BayesNetwork::new();
        net.add_cause_effect("A", "B").expect("a->b");
        net.add_cause_effect("B", "C").expect("b->c");
        net.set_distribution("A", binary("A", None, &[p_a])).expect("a");
        net.set_distribution("B", binary("B", Some("A"), &p_b)).expect("b");
        net.set_distribution("C", binary("C", Some("B"), &p_c)).expect("c");

        let joint = EventCatenation::from_events([
            Event::equals("A", values[0]),
            Event::equals("B", values[1]),
            Event::equals("C", values[2]),
        ])
        .expect("joint");
        let query = ConditionalEvent::unconditional(joint);
        let direct = net.probability(&query).expect("direct");
        let chained = net
            .chain_rule_probability(&query, &["C", "A", "B"])
            .expect("chained");
        prop_assert!((direct - chained).abs() < 1e-9);
    }
}

/// `P(name = true | parent)` per parent value (`false` first), or a single
/// prior without a parent.
fn binary(name: &str, parent: Option<&str>, p_true: &[f64]) -> Distribution {
    let mut table = DiscreteDistribution::new(name, ValueRange::new());
    for (i, p) in p_true.iter().enumerate() {
        let given = match parent {
            Some(parent) => EventCatenation::from_events([Event::equals(parent, i == 1)])
                .expect("condition"),
            None => EventCatenation::new(),
        };
        table
            .set(Event::equals(name, true), given.clone(), *p)
            .expect("true");
        table
            .set(Event::equals(name, false), given, 1.0 - p)
            .expect("false");
    }
    Distribution::Discrete(table)
}
