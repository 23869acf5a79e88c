//! # Intervals
//!
//! Half/fully open or closed intervals over the scalar types of the
//! variant layer. A side is either finite (its bound is meaningful and
//! may be open or closed) or infinite (its bound is pinned to the domain
//! extreme of `T` and containment short-circuits on that side).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// BOUND TRAIT
// =============================================================================

/// A scalar usable as an interval bound.
pub trait Bound: Clone + PartialOrd + fmt::Debug + fmt::Display {
    /// Smallest representable value, used for left-infinite sides.
    fn domain_min() -> Self;

    /// Largest representable value, used for right-infinite sides.
    fn domain_max() -> Self;

    /// Total order used for normalization and for ordering variants.
    fn total_order(&self, other: &Self) -> Ordering;

    /// Feed the bound into a hasher consistently with `total_order`.
    fn hash_bound<H: Hasher>(&self, state: &mut H);
}

macro_rules! ordered_bound {
    ($t:ty, $min:expr, $max:expr) => {
        impl Bound for $t {
            fn domain_min() -> Self {
                $min
            }

            fn domain_max() -> Self {
                $max
            }

            fn total_order(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn hash_bound<H: Hasher>(&self, state: &mut H) {
                self.hash(state);
            }
        }
    };
}

ordered_bound!(bool, false, true);
ordered_bound!(char, '\0', char::MAX);
ordered_bound!(i64, i64::MIN, i64::MAX);
ordered_bound!(u64, u64::MIN, u64::MAX);
ordered_bound!(NaiveDateTime, NaiveDateTime::MIN, NaiveDateTime::MAX);
// Strings have no greatest element; the right-infinite flag carries the meaning.
ordered_bound!(String, String::new(), char::MAX.to_string());

/// Both zeros compare equal and every NaN is one value, above `+inf`.
fn canonical_float(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x.is_nan() {
        f64::NAN
    } else {
        x
    }
}

impl Bound for f64 {
    fn domain_min() -> Self {
        f64::MIN
    }

    fn domain_max() -> Self {
        f64::MAX
    }

    fn total_order(&self, other: &Self) -> Ordering {
        canonical_float(*self).total_cmp(&canonical_float(*other))
    }

    fn hash_bound<H: Hasher>(&self, state: &mut H) {
        canonical_float(*self).to_bits().hash(state);
    }
}

// =============================================================================
// BOUNDARY FLAGS
// =============================================================================

/// Per-side shape of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundaryFlags {
    pub left_finite: bool,
    pub right_finite: bool,
    pub left_closed: bool,
    pub right_closed: bool,
}

impl BoundaryFlags {
    /// Both sides finite and closed.
    pub const CLOSED: Self = Self {
        left_finite: true,
        right_finite: true,
        left_closed: true,
        right_closed: true,
    };

    /// Both sides infinite.
    pub const UNBOUNDED: Self = Self {
        left_finite: false,
        right_finite: false,
        left_closed: true,
        right_closed: true,
    };
}

/// Boundary tags accepted by the interval constructors.
///
/// `LeftFinite` and `RightInfinite` mean the same thing for a single-bound
/// interval (the bound is the left one), as do `RightFinite` and
/// `LeftInfinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryTag {
    LeftFinite,
    RightFinite,
    LeftInfinite,
    RightInfinite,
    LeftClosed,
    RightClosed,
    LeftOpen,
    RightOpen,
}

/// Explicit closed beats explicit open; both beat the closed default.
fn resolve_closed(tags: &[BoundaryTag], closed: BoundaryTag, open: BoundaryTag) -> bool {
    tags.contains(&closed) || !tags.contains(&open)
}

// =============================================================================
// INTERVAL
// =============================================================================

/// An interval `low..high` with per-side finiteness and closedness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval<T> {
    low: T,
    high: T,
    flags: BoundaryFlags,
}

impl<T: Bound> Default for Interval<T> {
    fn default() -> Self {
        Self::full()
    }
}

impl<T: Bound> Interval<T> {
    /// The whole domain `[min, max]`, both sides infinite.
    pub fn full() -> Self {
        Self {
            low: T::domain_min(),
            high: T::domain_max(),
            flags: BoundaryFlags::UNBOUNDED,
        }
    }

    /// A half-infinite interval with a single finite bound.
    ///
    /// Without a side tag the bound is the left one. When both sides are
    /// requested the left side wins.
    pub fn from_bound(bound: T, tags: &[BoundaryTag]) -> Self {
        let wants_left = tags
            .iter()
            .any(|t| matches!(t, BoundaryTag::LeftFinite | BoundaryTag::RightInfinite));
        let wants_right = tags
            .iter()
            .any(|t| matches!(t, BoundaryTag::RightFinite | BoundaryTag::LeftInfinite));
        let left_closed = resolve_closed(tags, BoundaryTag::LeftClosed, BoundaryTag::LeftOpen);
        let right_closed = resolve_closed(tags, BoundaryTag::RightClosed, BoundaryTag::RightOpen);

        if wants_left || !wants_right {
            Self {
                low: bound,
                high: T::domain_max(),
                flags: BoundaryFlags {
                    left_finite: true,
                    right_finite: false,
                    left_closed,
                    right_closed,
                },
            }
        } else {
            Self {
                low: T::domain_min(),
                high: bound,
                flags: BoundaryFlags {
                    left_finite: false,
                    right_finite: true,
                    left_closed,
                    right_closed,
                },
            }
        }
    }

    /// A finite interval; the bounds may come in either order.
    pub fn between(a: T, b: T, tags: &[BoundaryTag]) -> Self {
        let (low, high) = if a.total_order(&b) == Ordering::Greater {
            (b, a)
        } else {
            (a, b)
        };
        Self {
            low,
            high,
            flags: BoundaryFlags {
                left_finite: true,
                right_finite: true,
                left_closed: resolve_closed(tags, BoundaryTag::LeftClosed, BoundaryTag::LeftOpen),
                right_closed: resolve_closed(
                    tags,
                    BoundaryTag::RightClosed,
                    BoundaryTag::RightOpen,
                ),
            },
        }
    }

    /// `[a, b]`
    pub fn closed(a: T, b: T) -> Self {
        Self::between(a, b, &[])
    }

    /// `[a, b)`
    pub fn closed_open(a: T, b: T) -> Self {
        Self::between(a, b, &[BoundaryTag::RightOpen])
    }

    /// `(a, b)`
    pub fn open(a: T, b: T) -> Self {
        Self::between(a, b, &[BoundaryTag::LeftOpen, BoundaryTag::RightOpen])
    }

    /// `[v, +inf)`
    pub fn at_least(v: T) -> Self {
        Self::from_bound(v, &[BoundaryTag::LeftFinite])
    }

    /// `(v, +inf)`
    pub fn greater_than(v: T) -> Self {
        Self::from_bound(v, &[BoundaryTag::LeftFinite, BoundaryTag::LeftOpen])
    }

    /// `(-inf, v]`
    pub fn at_most(v: T) -> Self {
        Self::from_bound(v, &[BoundaryTag::RightFinite])
    }

    /// `(-inf, v)`
    pub fn less_than(v: T) -> Self {
        Self::from_bound(v, &[BoundaryTag::RightFinite, BoundaryTag::RightOpen])
    }

    pub fn low(&self) -> &T {
        &self.low
    }

    pub fn high(&self) -> &T {
        &self.high
    }

    pub fn flags(&self) -> BoundaryFlags {
        self.flags
    }

    pub fn is_left_finite(&self) -> bool {
        self.flags.left_finite
    }

    pub fn is_right_finite(&self) -> bool {
        self.flags.right_finite
    }

    /// Membership test honouring closed/open flags per side.
    pub fn contains(&self, v: &T) -> bool {
        let left = !self.flags.left_finite
            || if self.flags.left_closed {
                self.low <= *v
            } else {
                self.low < *v
            };
        let right = !self.flags.right_finite
            || if self.flags.right_closed {
                *v <= self.high
            } else {
                *v < self.high
            };
        left && right
    }

    /// Whether every member of `self` is a member of `other`.
    ///
    /// For closed sides this is `other.contains(low) && other.contains(high)`;
    /// open sides are compared by bound and openness so that `[0, 1)` is a
    /// sub-interval of itself.
    pub fn is_sub_interval_of(&self, other: &Self) -> bool {
        let left = if !other.flags.left_finite {
            true
        } else if !self.flags.left_finite {
            false
        } else {
            match self.low.partial_cmp(&other.low) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => other.flags.left_closed || !self.flags.left_closed,
                _ => false,
            }
        };
        let right = if !other.flags.right_finite {
            true
        } else if !self.flags.right_finite {
            false
        } else {
            match self.high.partial_cmp(&other.high) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => other.flags.right_closed || !self.flags.right_closed,
                _ => false,
            }
        };
        left && right
    }

    /// Whether the two intervals share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.ends_before(other) && !other.ends_before(self)
    }

    fn ends_before(&self, other: &Self) -> bool {
        if !self.flags.right_finite || !other.flags.left_finite {
            return false;
        }
        match self.high.partial_cmp(&other.low) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !(self.flags.right_closed && other.flags.left_closed),
            _ => false,
        }
    }

    /// Total order: low bound, then high bound, then flags.
    pub fn total_order(&self, other: &Self) -> Ordering {
        self.low
            .total_order(&other.low)
            .then_with(|| self.high.total_order(&other.high))
            .then_with(|| self.flags.cmp(&other.flags))
    }

    pub(crate) fn hash_interval<H: Hasher>(&self, state: &mut H) {
        self.low.hash_bound(state);
        self.high.hash_bound(state);
        self.flags.hash(state);
    }
}

impl Interval<f64> {
    /// Bounds as floats with infinite sides mapped to `-inf` / `+inf`.
    pub fn finite_bounds(&self) -> (f64, f64) {
        let low = if self.flags.left_finite {
            self.low
        } else {
            f64::NEG_INFINITY
        };
        let high = if self.flags.right_finite {
            self.high
        } else {
            f64::INFINITY
        };
        (low, high)
    }
}

impl<T: Bound> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags.left_finite {
            let open = if self.flags.left_closed { '[' } else { '(' };
            write!(f, "{open}{}", self.low)?;
        } else {
            f.write_str("(-inf")?;
        }
        f.write_str(", ")?;
        if self.flags.right_finite {
            let close = if self.flags.right_closed { ']' } else { ')' };
            write!(f, "{}{close}", self.high)
        } else {
            f.write_str("+inf)")
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
