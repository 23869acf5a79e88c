//! # Property Indexes
//!
//! Lookup structures from a vertex or edge property to the ids carrying it.
//! The index type of a graph is chosen from the property type through
//! [`AutoIndex`]: hashable properties get a [`HashIndex`], float-like
//! properties with only partial equality fall back to a [`LinearIndex`].
//! [`OrderedIndex`] is available for properties that are `Ord` but should
//! not be hashed; pass it explicitly to [`DirectedGraph`].
//!
//! Every index returns ids in ascending order so lookups stay deterministic
//! whatever the backing container.
//!
//! [`DirectedGraph`]: super::DirectedGraph

use crate::variant::{Bound, Interval, Variant};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

// =============================================================================
// INDEX TRAIT
// =============================================================================

/// Maps properties to the ids that carry them. One property may map to
/// several ids.
pub trait PropertyIndex<P, K>: Default + Clone + fmt::Debug {
    fn insert(&mut self, property: &P, key: K);

    fn remove(&mut self, property: &P, key: K);

    /// Ids carrying `property`, ascending.
    fn find(&self, property: &P) -> Vec<K>;

    fn contains(&self, property: &P) -> bool;
}

// =============================================================================
// IMPLEMENTATIONS
// =============================================================================

/// Hash-keyed index.
#[derive(Debug, Clone)]
pub struct HashIndex<P, K> {
    entries: HashMap<P, BTreeSet<K>>,
}

impl<P, K> Default for HashIndex<P, K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<P, K> PropertyIndex<P, K> for HashIndex<P, K>
where
    P: Hash + Eq + Clone + fmt::Debug,
    K: Copy + Ord + fmt::Debug,
{
    fn insert(&mut self, property: &P, key: K) {
        self.entries.entry(property.clone()).or_default().insert(key);
    }

    fn remove(&mut self, property: &P, key: K) {
        if let Some(keys) = self.entries.get_mut(property) {
            keys.remove(&key);
            if keys.is_empty() {
                self.entries.remove(property);
            }
        }
    }

    fn find(&self, property: &P) -> Vec<K> {
        self.entries
            .get(property)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    fn contains(&self, property: &P) -> bool {
        self.entries.contains_key(property)
    }
}

/// Order-keyed index.
#[derive(Debug, Clone)]
pub struct OrderedIndex<P, K> {
    entries: BTreeMap<P, BTreeSet<K>>,
}

impl<P, K> Default for OrderedIndex<P, K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P, K> PropertyIndex<P, K> for OrderedIndex<P, K>
where
    P: Ord + Clone + fmt::Debug,
    K: Copy + Ord + fmt::Debug,
{
    fn insert(&mut self, property: &P, key: K) {
        self.entries.entry(property.clone()).or_default().insert(key);
    }

    fn remove(&mut self, property: &P, key: K) {
        if let Some(keys) = self.entries.get_mut(property) {
            keys.remove(&key);
            if keys.is_empty() {
                self.entries.remove(property);
            }
        }
    }

    fn find(&self, property: &P) -> Vec<K> {
        self.entries
            .get(property)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    fn contains(&self, property: &P) -> bool {
        self.entries.contains_key(property)
    }
}

/// Scan-based index for properties with only `PartialEq`.
#[derive(Debug, Clone)]
pub struct LinearIndex<P, K> {
    entries: Vec<(P, K)>,
}

impl<P, K> Default for LinearIndex<P, K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P, K> PropertyIndex<P, K> for LinearIndex<P, K>
where
    P: PartialEq + Clone + fmt::Debug,
    K: Copy + Ord + fmt::Debug,
{
    fn insert(&mut self, property: &P, key: K) {
        self.entries.push((property.clone(), key));
    }

    fn remove(&mut self, property: &P, key: K) {
        self.entries.retain(|(p, k)| !(*k == key && p == property));
    }

    fn find(&self, property: &P) -> Vec<K> {
        let mut keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(p, _)| p == property)
            .map(|(_, k)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn contains(&self, property: &P) -> bool {
        self.entries.iter().any(|(p, _)| p == property)
    }
}

// =============================================================================
// AUTOMATIC SELECTION
// =============================================================================

/// Default index type for a property, keyed by id type `K`.
pub trait AutoIndex: Sized {
    type Index<K: Copy + Ord + fmt::Debug>: PropertyIndex<Self, K>;
}

macro_rules! hashed {
    ($($t:ty),* $(,)?) => {
        $(
            impl AutoIndex for $t {
                type Index<K: Copy + Ord + fmt::Debug> = HashIndex<$t, K>;
            }
        )*
    };
}

hashed!(
    (),
    bool,
    char,
    i32,
    i64,
    u32,
    u64,
    usize,
    String,
    Variant,
    chrono::NaiveDateTime,
);

impl AutoIndex for f64 {
    type Index<K: Copy + Ord + fmt::Debug> = LinearIndex<f64, K>;
}

impl<T: Bound> AutoIndex for Interval<T> {
    type Index<K: Copy + Ord + fmt::Debug> = LinearIndex<Interval<T>, K>;
}
