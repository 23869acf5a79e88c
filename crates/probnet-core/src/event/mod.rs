//! # Events
//!
//! The algebraic skeleton of `P(E | C)`:
//!
//! - [`Event`]: `name op value`
//! - [`EventCatenation`]: conjunction keyed by name, conflict-checked
//! - [`ConditionalEvent`]: event conjunction given a condition conjunction

mod catenation;
mod conditional;
mod predicate;

pub use catenation::EventCatenation;
pub use conditional::ConditionalEvent;
pub use predicate::Event;
