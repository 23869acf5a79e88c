//! # String Scanning
//!
//! Typed parsing of text into variants. The boolean lexicon and the
//! timestamp formats here are shared with table type inference.

use super::interval::{BoundaryTag, Interval};
use super::value::{ScalarKind, Scalar, Variant};
use crate::error::{ProbNetError, Result};
use chrono::{NaiveDate, NaiveDateTime};

const TRUE_LITERALS: [&str; 6] = ["true", "yes", "on", "t", "y", "1"];
const FALSE_LITERALS: [&str; 6] = ["false", "no", "off", "f", "n", "0"];

/// Accepted timestamp layouts, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Parse a boolean literal, case-insensitively.
pub fn scan_bool(literal: &str) -> Result<bool> {
    let lowered = literal.trim().to_ascii_lowercase();
    if TRUE_LITERALS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ProbNetError::BoolScan {
            literal: literal.to_owned(),
        })
    }
}

/// Parse a timestamp in one of the accepted layouts. Dates without a time
/// component are taken at midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn scan_error(literal: &str, expected: ScalarKind) -> ProbNetError {
    ProbNetError::Scan {
        literal: literal.to_owned(),
        expected,
    }
}

impl Variant {
    /// Parse `text` as a scalar of the given kind.
    ///
    /// Numeric text is trimmed; `Text` keeps the input verbatim.
    pub fn scan(text: &str, kind: ScalarKind) -> Result<Variant> {
        let trimmed = text.trim();
        let value = match kind {
            ScalarKind::Bool => Variant::Bool(scan_bool(trimmed)?),
            ScalarKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Variant::Char(c),
                    _ => return Err(scan_error(text, kind)),
                }
            }
            ScalarKind::Int => Variant::Int(
                trimmed
                    .parse::<i64>()
                    .map_err(|_| scan_error(text, kind))?,
            ),
            ScalarKind::UInt => Variant::UInt(
                trimmed
                    .parse::<u64>()
                    .map_err(|_| scan_error(text, kind))?,
            ),
            ScalarKind::Float => Variant::Float(
                trimmed
                    .parse::<f64>()
                    .map_err(|_| scan_error(text, kind))?,
            ),
            ScalarKind::Timestamp => {
                Variant::Timestamp(parse_timestamp(trimmed).ok_or_else(|| scan_error(text, kind))?)
            }
            ScalarKind::Text => Variant::Text(text.to_owned()),
        };
        Ok(value)
    }

    /// Parse bracket notation such as `[0, 1)` or `(-inf, 3]` into an
    /// interval variant over `kind`.
    pub fn scan_interval(text: &str, kind: ScalarKind) -> Result<Variant> {
        let trimmed = text.trim();
        let malformed = || ProbNetError::Scan {
            literal: text.to_owned(),
            expected: kind,
        };
        let mut chars = trimmed.chars();
        let open = chars.next().ok_or_else(malformed)?;
        let close = chars.next_back().ok_or_else(malformed)?;
        let left_closed = match open {
            '[' => true,
            '(' => false,
            _ => return Err(malformed()),
        };
        let right_closed = match close {
            ']' => true,
            ')' => false,
            _ => return Err(malformed()),
        };
        let (low, high) = chars.as_str().split_once(',').ok_or_else(malformed)?;
        let low = low.trim();
        let high = high.trim();
        let low = (!is_infinite(low)).then_some(low);
        let high = (!is_infinite(high)).then_some(high);

        let mut tags = vec![
            if left_closed {
                BoundaryTag::LeftClosed
            } else {
                BoundaryTag::LeftOpen
            },
            if right_closed {
                BoundaryTag::RightClosed
            } else {
                BoundaryTag::RightOpen
            },
        ];
        match kind {
            ScalarKind::Bool => build::<bool>(low, high, kind, &mut tags),
            ScalarKind::Char => build::<char>(low, high, kind, &mut tags),
            ScalarKind::Int => build::<i64>(low, high, kind, &mut tags),
            ScalarKind::UInt => build::<u64>(low, high, kind, &mut tags),
            ScalarKind::Float => build::<f64>(low, high, kind, &mut tags),
            ScalarKind::Timestamp => build::<NaiveDateTime>(low, high, kind, &mut tags),
            ScalarKind::Text => build::<String>(low, high, kind, &mut tags),
        }
    }
}

fn is_infinite(bound: &str) -> bool {
    matches!(bound, "-inf" | "+inf" | "inf" | "")
}

fn build<T: Scalar>(
    low: Option<&str>,
    high: Option<&str>,
    kind: ScalarKind,
    tags: &mut Vec<BoundaryTag>,
) -> Result<Variant> {
    let parse = |s: &str| Variant::scan(s, kind).and_then(|v| v.get::<T>());
    let interval = match (low, high) {
        (Some(lo), Some(hi)) => Interval::between(parse(lo)?, parse(hi)?, tags),
        (Some(lo), None) => {
            tags.push(BoundaryTag::LeftFinite);
            Interval::from_bound(parse(lo)?, tags)
        }
        (None, Some(hi)) => {
            tags.push(BoundaryTag::RightFinite);
            Interval::from_bound(parse(hi)?, tags)
        }
        (None, None) => Interval::full(),
    };
    Ok(Variant::from(interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Tag;

    #[test]
    fn bool_lexicon() {
        for lit in ["true", "YES", "On", "t", "y", "1"] {
            assert!(scan_bool(lit).expect("true literal"), "{lit}");
        }
        for lit in ["false", "No", "OFF", "f", "n", "0"] {
            assert!(!scan_bool(lit).expect("false literal"), "{lit}");
        }
        assert_eq!(
            scan_bool("maybe"),
            Err(ProbNetError::BoolScan {
                literal: "maybe".to_owned()
            })
        );
    }

    #[test]
    fn timestamps() {
        let a = parse_timestamp("2024-03-01").expect("iso date");
        let b = parse_timestamp("01.03.2024").expect("dotted date");
        let c = parse_timestamp("03/01/2024").expect("us date");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_timestamp("2024-03-01 12:30:00").expect("datetime") > a);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn typed_scan() {
        assert_eq!(
            Variant::scan(" 42 ", ScalarKind::Int).expect("int"),
            Variant::Int(42)
        );
        assert_eq!(
            Variant::scan("x", ScalarKind::Char).expect("char"),
            Variant::Char('x')
        );
        let err = Variant::scan("-1", ScalarKind::UInt).expect_err("negative uint");
        assert_eq!(
            err,
            ProbNetError::Scan {
                literal: "-1".to_owned(),
                expected: ScalarKind::UInt
            }
        );
    }

    #[test]
    fn interval_notation() {
        let v = Variant::scan_interval("[0, 1)", ScalarKind::Float).expect("interval");
        assert_eq!(v.tag(), Tag::Interval(ScalarKind::Float));
        let iv = v.interval::<f64>().expect("float interval");
        assert!(iv.contains(&0.0));
        assert!(!iv.contains(&1.0));

        let v = Variant::scan_interval("(-inf, 3]", ScalarKind::Int).expect("half line");
        let iv = v.interval::<i64>().expect("int interval");
        assert!(!iv.is_left_finite());
        assert!(iv.contains(&i64::MIN));
        assert!(iv.contains(&3));
        assert!(!iv.contains(&4));

        assert!(Variant::scan_interval("0, 1", ScalarKind::Float).is_err());
    }
}
