//! # Variant Layer
//!
//! Typed dynamic values over a closed set of scalars and their intervals.
//!
//! - [`Variant`]: tagged value with a total order across tags
//! - [`Interval`]: open/closed, finite/infinite intervals
//! - [`MatchOp`]: comparisons events apply to values
//! - scanning: typed parsing of text, including the boolean lexicon

mod interval;
mod operation;
mod scan;
mod value;

pub use interval::{Bound, BoundaryFlags, BoundaryTag, Interval};
pub use operation::MatchOp;
pub use scan::{parse_timestamp, scan_bool};
pub use value::{IntervalValue, Scalar, ScalarKind, TIMESTAMP_FORMAT, Tag, Variant};
