//! # Value Ranges
//!
//! The set of values an event over one variable may take: either an
//! enumerated set of same-tag variants, or a continuous extent over
//! floats tagged with the family of function that models it.

use crate::error::{EventRangeKind, ProbNetError, Result};
use crate::event::Event;
use crate::primitives::MAX_ENUMERATED_RANGE;
use crate::variant::{ScalarKind, Tag, Variant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Continuous function family a range is modelled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContinuousKind {
    FloatUniform,
    Gaussian,
    Exponential,
}

impl fmt::Display for ContinuousKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FloatUniform => "float_uniform",
            Self::Gaussian => "gaussian",
            Self::Exponential => "exponential",
        })
    }
}

/// Values a single variable may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueRange {
    /// Enumerated set; all members share one tag.
    Discrete(BTreeSet<Variant>),
    /// Float extent. `None` bounds are unbounded on that side.
    Continuous {
        kind: ContinuousKind,
        low: Option<f64>,
        high: Option<f64>,
    },
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::Discrete(BTreeSet::new())
    }
}

impl ValueRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// An unbounded continuous range of the given family.
    pub fn continuous(kind: ContinuousKind) -> Self {
        Self::Continuous {
            kind,
            low: None,
            high: None,
        }
    }

    /// Build a discrete range from values that must share one tag.
    pub fn from_values<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Variant>,
    {
        let mut range = Self::new();
        for value in values {
            range.add(value.into())?;
        }
        Ok(range)
    }

    /// Tag of the members, or `float` for a continuous range. `None` while
    /// an enumerated range is still empty.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Self::Discrete(values) => values.first().map(Variant::tag),
            Self::Continuous { .. } => Some(Tag::Scalar(ScalarKind::Float)),
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }

    pub fn continuous_kind(&self) -> Option<ContinuousKind> {
        match self {
            Self::Continuous { kind, .. } => Some(*kind),
            Self::Discrete(_) => None,
        }
    }

    /// Bounds of a continuous range; `None` for enumerated ranges.
    pub fn bounds(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self {
            Self::Continuous { low, high, .. } => Some((*low, *high)),
            Self::Discrete(_) => None,
        }
    }

    /// Number of enumerated members; 0 for continuous ranges.
    pub fn len(&self) -> usize {
        match self {
            Self::Discrete(values) => values.len(),
            Self::Continuous { .. } => 0,
        }
    }

    /// A continuous range is never empty; an enumerated one is empty
    /// until its first value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Discrete(values) => values.is_empty(),
            Self::Continuous { .. } => false,
        }
    }

    /// Enumerated members in order; nothing for continuous ranges.
    pub fn values(&self) -> impl Iterator<Item = &Variant> {
        let values = match self {
            Self::Discrete(values) => Some(values.iter()),
            Self::Continuous { .. } => None,
        };
        values.into_iter().flatten()
    }

    /// Insert a value whose tag agrees with the existing members.
    pub fn add(&mut self, value: Variant) -> Result<()> {
        match self {
            Self::Continuous { .. } => Err(ProbNetError::event_range(
                EventRangeKind::ContinuousRange,
                value,
            )),
            Self::Discrete(values) => {
                if let Some(first) = values.first()
                    && first.tag() != value.tag()
                {
                    return Err(ProbNetError::event_range(EventRangeKind::TypeMismatch, value));
                }
                values.insert(value);
                Ok(())
            }
        }
    }

    /// Add every value in `[lo, hi]` (either order).
    ///
    /// Integral kinds are enumerated; floats switch the range to a
    /// continuous uniform extent covering both bounds and any float
    /// members already present.
    pub fn add_range(&mut self, lo: Variant, hi: Variant) -> Result<()> {
        if lo.tag() != hi.tag() {
            return Err(ProbNetError::event_range(EventRangeKind::TypeMismatch, hi));
        }
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        if let Some(tag) = self.tag()
            && tag != lo.tag()
        {
            return Err(ProbNetError::event_range(EventRangeKind::TypeMismatch, lo));
        }

        if let (Variant::Float(a), Variant::Float(b)) = (&lo, &hi) {
            return self.add_float_extent(*a, *b);
        }
        if self.is_continuous() {
            return Err(ProbNetError::event_range(EventRangeKind::ContinuousRange, lo));
        }

        let enumerated: Vec<Variant> = match (&lo, &hi) {
            (Variant::Int(a), Variant::Int(b)) => {
                check_width(*a as i128, *b as i128, &lo, &hi)?;
                (*a..=*b).map(Variant::Int).collect()
            }
            (Variant::UInt(a), Variant::UInt(b)) => {
                check_width(*a as i128, *b as i128, &lo, &hi)?;
                (*a..=*b).map(Variant::UInt).collect()
            }
            (Variant::Char(a), Variant::Char(b)) => {
                check_width(*a as i128, *b as i128, &lo, &hi)?;
                (*a..=*b).map(Variant::Char).collect()
            }
            (Variant::Bool(a), Variant::Bool(b)) => {
                [false, true]
                    .into_iter()
                    .filter(|v| a <= v && v <= b)
                    .map(Variant::Bool)
                    .collect()
            }
            _ => {
                return Err(ProbNetError::event_range(
                    EventRangeKind::TypeMismatch,
                    format!("{lo}..={hi} is not enumerable"),
                ));
            }
        };
        if let Self::Discrete(values) = self {
            values.extend(enumerated);
        }
        Ok(())
    }

    fn add_float_extent(&mut self, a: f64, b: f64) -> Result<()> {
        match self {
            Self::Continuous { low, high, .. } => {
                *low = Some(low.map_or(a, |l| l.min(a)));
                *high = Some(high.map_or(b, |h| h.max(b)));
            }
            Self::Discrete(values) => {
                let (low, high) = values
                    .iter()
                    .filter_map(Variant::as_f64)
                    .fold((a, b), |(l, h), x| (l.min(x), h.max(x)));
                *self = Self::Continuous {
                    kind: ContinuousKind::FloatUniform,
                    low: Some(low),
                    high: Some(high),
                };
            }
        }
        Ok(())
    }

    /// Widen a continuous range so it covers `x`. No-op for enumerated ranges.
    pub fn extend_bounds(&mut self, x: f64) {
        if let Self::Continuous { low, high, .. } = self {
            *low = Some(low.map_or(x, |l| l.min(x)));
            *high = Some(high.map_or(x, |h| h.max(x)));
        }
    }

    /// Membership for enumerated ranges; tag and bound check for
    /// continuous ones.
    pub fn valid_value(&self, value: &Variant) -> bool {
        match self {
            Self::Discrete(values) => values.contains(value),
            Self::Continuous { low, high, .. } => match value {
                Variant::Float(x) => {
                    low.is_none_or(|l| l <= *x) && high.is_none_or(|h| *x <= h)
                }
                _ => false,
            },
        }
    }

    /// Whether `value`, or the bounds of an interval `value`, has the tag
    /// this range expects.
    pub fn accepts_tag(&self, value: &Variant) -> bool {
        let scalar = Tag::Scalar(value.tag().kind());
        self.tag().is_none_or(|tag| tag == scalar)
    }

    /// One equality event per member, named `name`.
    pub fn make_event_collection(&self, name: &str) -> Vec<Event> {
        self.values()
            .map(|value| Event::equals(name, value.clone()))
            .collect()
    }
}

fn check_width(lo: i128, hi: i128, lo_value: &Variant, hi_value: &Variant) -> Result<()> {
    if hi - lo + 1 > MAX_ENUMERATED_RANGE as i128 {
        return Err(ProbNetError::event_range(
            EventRangeKind::EnumerationLimit,
            format!("{lo_value}..={hi_value}"),
        ));
    }
    Ok(())
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            Self::Continuous { kind, low, high } => {
                let low = low.map_or_else(|| "-inf".to_owned(), |l| l.to_string());
                let high = high.map_or_else(|| "+inf".to_owned(), |h| h.to_string());
                write!(f, "{kind}[{low}, {high}]")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
