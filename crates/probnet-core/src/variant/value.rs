//! # Variant Values
//!
//! `Variant` is the closed sum of scalar and interval payloads every
//! event, range and table cell is built on. Variants of different tags
//! order by tag name; variants of the same tag order by payload.

use super::interval::{Bound, Interval};
use crate::error::{ProbNetError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Rendering used for timestamps in `Display` and table output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// TAGS
// =============================================================================

/// The scalar kinds a variant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    Timestamp,
    Text,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 7] = [
        Self::Bool,
        Self::Char,
        Self::Int,
        Self::UInt,
        Self::Float,
        Self::Timestamp,
        Self::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Timestamp => "date",
            Self::Text => "string",
        }
    }

    /// Kinds whose values can be enumerated one by one.
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Bool | Self::Char | Self::Int | Self::UInt)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime tag of a variant: a scalar kind, or an interval over one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Scalar(ScalarKind),
    Interval(ScalarKind),
}

impl Tag {
    /// Stable name; cross-tag ordering of variants follows it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Interval(ScalarKind::Bool) => "interval<bool>",
            Self::Interval(ScalarKind::Char) => "interval<char>",
            Self::Interval(ScalarKind::Int) => "interval<int>",
            Self::Interval(ScalarKind::UInt) => "interval<uint>",
            Self::Interval(ScalarKind::Float) => "interval<float>",
            Self::Interval(ScalarKind::Timestamp) => "interval<date>",
            Self::Interval(ScalarKind::Text) => "interval<string>",
        }
    }

    /// The scalar kind of the value or of the interval's bounds.
    pub fn kind(self) -> ScalarKind {
        match self {
            Self::Scalar(kind) | Self::Interval(kind) => kind,
        }
    }

    pub fn is_interval(self) -> bool {
        matches!(self, Self::Interval(_))
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// INTERVAL PAYLOAD
// =============================================================================

/// An interval over one of the scalar kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IntervalValue {
    Bool(Interval<bool>),
    Char(Interval<char>),
    Int(Interval<i64>),
    UInt(Interval<u64>),
    Float(Interval<f64>),
    Timestamp(Interval<NaiveDateTime>),
    Text(Interval<String>),
}

impl IntervalValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Char(_) => ScalarKind::Char,
            Self::Int(_) => ScalarKind::Int,
            Self::UInt(_) => ScalarKind::UInt,
            Self::Float(_) => ScalarKind::Float,
            Self::Timestamp(_) => ScalarKind::Timestamp,
            Self::Text(_) => ScalarKind::Text,
        }
    }

    /// Whether `value` is a scalar of this interval's kind lying inside it.
    pub fn contains(&self, value: &Variant) -> bool {
        match (self, value) {
            (Self::Bool(iv), Variant::Bool(v)) => iv.contains(v),
            (Self::Char(iv), Variant::Char(v)) => iv.contains(v),
            (Self::Int(iv), Variant::Int(v)) => iv.contains(v),
            (Self::UInt(iv), Variant::UInt(v)) => iv.contains(v),
            (Self::Float(iv), Variant::Float(v)) => iv.contains(v),
            (Self::Timestamp(iv), Variant::Timestamp(v)) => iv.contains(v),
            (Self::Text(iv), Variant::Text(v)) => iv.contains(v),
            _ => false,
        }
    }

    fn total_order(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.total_order(b),
            (Self::Char(a), Self::Char(b)) => a.total_order(b),
            (Self::Int(a), Self::Int(b)) => a.total_order(b),
            (Self::UInt(a), Self::UInt(b)) => a.total_order(b),
            (Self::Float(a), Self::Float(b)) => a.total_order(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.total_order(b),
            (Self::Text(a), Self::Text(b)) => a.total_order(b),
            _ => self.kind().name().cmp(other.kind().name()),
        }
    }

    fn hash_payload<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Bool(iv) => iv.hash_interval(state),
            Self::Char(iv) => iv.hash_interval(state),
            Self::Int(iv) => iv.hash_interval(state),
            Self::UInt(iv) => iv.hash_interval(state),
            Self::Float(iv) => iv.hash_interval(state),
            Self::Timestamp(iv) => iv.hash_interval(state),
            Self::Text(iv) => iv.hash_interval(state),
        }
    }
}

impl fmt::Display for IntervalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(iv) => iv.fmt(f),
            Self::Char(iv) => iv.fmt(f),
            Self::Int(iv) => iv.fmt(f),
            Self::UInt(iv) => iv.fmt(f),
            Self::Float(iv) => iv.fmt(f),
            Self::Timestamp(iv) => iv.fmt(f),
            Self::Text(iv) => iv.fmt(f),
        }
    }
}

// =============================================================================
// VARIANT
// =============================================================================

/// A tagged value holding exactly one scalar or interval payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Variant {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
    Interval(IntervalValue),
}

impl Variant {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Bool(_) => Tag::Scalar(ScalarKind::Bool),
            Self::Char(_) => Tag::Scalar(ScalarKind::Char),
            Self::Int(_) => Tag::Scalar(ScalarKind::Int),
            Self::UInt(_) => Tag::Scalar(ScalarKind::UInt),
            Self::Float(_) => Tag::Scalar(ScalarKind::Float),
            Self::Timestamp(_) => Tag::Scalar(ScalarKind::Timestamp),
            Self::Text(_) => Tag::Scalar(ScalarKind::Text),
            Self::Interval(iv) => Tag::Interval(iv.kind()),
        }
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, Self::Interval(_))
    }

    /// Extract the scalar payload, failing with a cast error on tag mismatch.
    pub fn get<T: Scalar>(&self) -> Result<T> {
        T::from_variant(self).ok_or(ProbNetError::Cast {
            from: self.tag(),
            to: Tag::Scalar(T::KIND),
        })
    }

    /// Borrow the interval payload, failing with a cast error on tag mismatch.
    pub fn interval<T: Scalar>(&self) -> Result<&Interval<T>> {
        match self {
            Self::Interval(iv) => T::from_interval_value(iv),
            _ => None,
        }
        .ok_or(ProbNetError::Cast {
            from: self.tag(),
            to: Tag::Interval(T::KIND),
        })
    }

    /// Numeric view of int, uint and float payloads.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn payload_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::UInt(a), Self::UInt(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_order(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Interval(a), Self::Interval(b)) => a.total_order(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Variant {}

impl PartialOrd for Variant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag()
            .cmp(&other.tag())
            .then_with(|| self.payload_cmp(other))
    }
}

impl Hash for Variant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Self::Bool(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::UInt(v) => v.hash(state),
            Self::Float(v) => v.hash_bound(state),
            Self::Timestamp(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
            Self::Interval(iv) => iv.hash_payload(state),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_FORMAT)),
            Self::Text(v) => f.write_str(v),
            Self::Interval(iv) => iv.fmt(f),
        }
    }
}

// =============================================================================
// SCALAR TRAIT
// =============================================================================

/// Rust types that map onto a variant scalar kind.
pub trait Scalar: Bound + Sized {
    const KIND: ScalarKind;

    fn from_variant(value: &Variant) -> Option<Self>;
    fn into_variant(self) -> Variant;
    fn from_interval_value(value: &IntervalValue) -> Option<&Interval<Self>>;
    fn into_interval_value(interval: Interval<Self>) -> IntervalValue;
}

macro_rules! scalar {
    ($t:ty, $kind:ident) => {
        impl Scalar for $t {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_variant(value: &Variant) -> Option<Self> {
                match value {
                    Variant::$kind(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn into_variant(self) -> Variant {
                Variant::$kind(self)
            }

            fn from_interval_value(value: &IntervalValue) -> Option<&Interval<Self>> {
                match value {
                    IntervalValue::$kind(iv) => Some(iv),
                    _ => None,
                }
            }

            fn into_interval_value(interval: Interval<Self>) -> IntervalValue {
                IntervalValue::$kind(interval)
            }
        }

        impl TryFrom<&Variant> for $t {
            type Error = ProbNetError;

            fn try_from(value: &Variant) -> Result<Self> {
                value.get()
            }
        }
    };
}

scalar!(bool, Bool);
scalar!(char, Char);
scalar!(i64, Int);
scalar!(u64, UInt);
scalar!(f64, Float);
scalar!(NaiveDateTime, Timestamp);
scalar!(String, Text);

impl<T: Scalar> From<T> for Variant {
    fn from(value: T) -> Self {
        value.into_variant()
    }
}

impl<T: Scalar> From<Interval<T>> for Variant {
    fn from(interval: Interval<T>) -> Self {
        Variant::Interval(T::into_interval_value(interval))
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::Text(value.to_owned())
    }
}

// =============================================================================
// TESTS
// =============================================================================
