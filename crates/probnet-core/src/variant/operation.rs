//! # Match Operations
//!
//! The comparison an event applies between an observed value and its own
//! value. Ops are a closed enum dispatched with a `match`.

use super::value::Variant;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// How an event's value is compared against an observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// The observed value lies inside the interval carried by the event.
    ElementOf,
    /// Stands for a name without a value; never matches.
    Placeholder,
}

impl MatchOp {
    /// Textual forms accepted by [`MatchOp::parse_prefix`], longest first.
    const SYMBOLS: [(&'static str, MatchOp); 8] = [
        ("!=", MatchOp::NotEqual),
        ("<=", MatchOp::LessEqual),
        (">=", MatchOp::GreaterEqual),
        ("==", MatchOp::Equal),
        (" in ", MatchOp::ElementOf),
        ("=", MatchOp::Equal),
        ("<", MatchOp::Less),
        (">", MatchOp::Greater),
    ];

    /// Evaluate `lhs op rhs`.
    ///
    /// Ordered comparisons require equal tags; mismatched tags never match.
    pub fn apply(self, lhs: &Variant, rhs: &Variant) -> bool {
        match self {
            Self::Placeholder => false,
            Self::ElementOf => match rhs {
                Variant::Interval(iv) => iv.contains(lhs),
                _ => false,
            },
            _ if lhs.tag() != rhs.tag() => false,
            _ => {
                let ord = lhs.cmp(rhs);
                match self {
                    Self::Equal => ord == Ordering::Equal,
                    Self::NotEqual => ord != Ordering::Equal,
                    Self::Less => ord == Ordering::Less,
                    Self::LessEqual => ord != Ordering::Greater,
                    Self::Greater => ord == Ordering::Greater,
                    Self::GreaterEqual => ord != Ordering::Less,
                    Self::ElementOf | Self::Placeholder => false,
                }
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::ElementOf => " in ",
            Self::Placeholder => "?",
        }
    }

    /// Locate the first operator in `text`, returning `(name, op, value)`.
    pub fn split_expression(text: &str) -> Option<(&str, MatchOp, &str)> {
        let mut best: Option<(usize, &str, MatchOp)> = None;
        for (symbol, op) in Self::SYMBOLS {
            if let Some(at) = text.find(symbol) {
                let better = match best {
                    None => true,
                    Some((pos, sym, _)) => at < pos || (at == pos && symbol.len() > sym.len()),
                };
                if better {
                    best = Some((at, symbol, op));
                }
            }
        }
        let (at, symbol, op) = best?;
        Some((&text[..at], op, &text[at + symbol.len()..]))
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Interval;

    #[test]
    fn comparisons() {
        let two = Variant::from(2_i64);
        let three = Variant::from(3_i64);
        assert!(MatchOp::Less.apply(&two, &three));
        assert!(MatchOp::LessEqual.apply(&three, &three));
        assert!(!MatchOp::Greater.apply(&two, &three));
        assert!(MatchOp::NotEqual.apply(&two, &three));
    }

    #[test]
    fn mismatched_tags_never_match() {
        let int = Variant::from(1_i64);
        let uint = Variant::from(1_u64);
        assert!(!MatchOp::Equal.apply(&int, &uint));
        assert!(!MatchOp::NotEqual.apply(&int, &uint));
    }

    #[test]
    fn element_of_requires_same_element_kind() {
        let unit = Variant::from(Interval::closed(0.0, 1.0));
        assert!(MatchOp::ElementOf.apply(&Variant::from(0.5), &unit));
        assert!(!MatchOp::ElementOf.apply(&Variant::from(2.0), &unit));
        assert!(!MatchOp::ElementOf.apply(&Variant::from(0_i64), &unit));
    }

    #[test]
    fn placeholder_matches_nothing() {
        let v = Variant::from(true);
        assert!(!MatchOp::Placeholder.apply(&v, &v));
    }

    #[test]
    fn split_prefers_longest_operator() {
        assert_eq!(
            MatchOp::split_expression("Rain<=3"),
            Some(("Rain", MatchOp::LessEqual, "3"))
        );
        assert_eq!(
            MatchOp::split_expression("Cloud=yes"),
            Some(("Cloud", MatchOp::Equal, "yes"))
        );
        assert_eq!(
            MatchOp::split_expression("x in [0, 1)"),
            Some(("x", MatchOp::ElementOf, "[0, 1)"))
        );
        assert_eq!(MatchOp::split_expression("nothing"), None);
    }
}
