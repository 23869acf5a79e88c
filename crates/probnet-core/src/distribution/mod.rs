//! # Probability Functions
//!
//! Conditional probability functions `P(X | parents)` trained from
//! weighted samples.
//!
//! - [`DiscreteDistribution`]: a table per condition block
//! - [`UniformDistribution`]: `[low, high]` per condition
//! - [`GaussianDistribution`]: `(μ, σ)` per condition
//! - [`ExponentialDistribution`]: `λ` per condition
//!
//! Every function is defined over a [`Domain`] and answers queries whose
//! event side holds exactly one event; the condition side selects the
//! parameter block.

mod discrete;
mod domain;
mod exponential;
mod gaussian;
mod normal;
mod uniform;

pub use discrete::DiscreteDistribution;
pub use domain::Domain;
pub use exponential::ExponentialDistribution;
pub use gaussian::GaussianDistribution;
pub use normal::{erf, standard_normal_cdf};
pub use uniform::UniformDistribution;

use crate::error::{EventRangeKind, ProbNetError, Result};
use crate::event::{ConditionalEvent, Event, EventCatenation};
use crate::range::{ContinuousKind, ValueRange};
use std::collections::BTreeMap;

// =============================================================================
// SAMPLES
// =============================================================================

/// One weighted observation of an event under a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub event: Event,
    pub condition: EventCatenation,
    pub weight: f64,
}

impl Sample {
    pub fn new(event: Event, condition: EventCatenation, weight: f64) -> Self {
        Self {
            event,
            condition,
            weight,
        }
    }
}

/// Reject negative or non-finite weights.
fn check_weights(samples: &[Sample]) -> Result<()> {
    match samples
        .iter()
        .find(|s| !s.weight.is_finite() || s.weight < 0.0)
    {
        Some(bad) => Err(ProbNetError::event_range(EventRangeKind::Weight, bad.weight)),
        None => Ok(()),
    }
}

/// Observations grouped by condition block.
type FloatGroups = BTreeMap<EventCatenation, Vec<(f64, f64)>>;

/// Float observations grouped by condition block, with weights, and
/// `domain` grown by the observed values. `domain` itself is untouched.
fn float_groups(samples: &[Sample], domain: &Domain) -> Result<(Domain, FloatGroups)> {
    check_weights(samples)?;
    let mut domain = domain.clone();
    let mut groups = FloatGroups::new();
    for sample in samples {
        let value = sample.event.value().ok_or_else(|| {
            ProbNetError::Event(format!("sample '{}' carries no value", sample.event))
        })?;
        let x = value.get::<f64>()?;
        for condition in &sample.condition {
            if let Some(v) = condition.value() {
                domain.observe_condition(condition.name(), v)?;
            }
        }
        domain.observe_event(sample.event.name(), value)?;
        groups
            .entry(sample.condition.clone())
            .or_default()
            .push((x, sample.weight));
    }
    Ok((domain, groups))
}

// =============================================================================
// FUNCTION TRAIT
// =============================================================================

/// Common contract of every probability function.
pub trait ProbabilityFunction {
    fn domain(&self) -> &Domain;

    fn domain_mut(&mut self) -> &mut Domain;

    /// Replace the parameters with ones fitted to `samples`.
    fn train(&mut self, samples: &[Sample]) -> Result<()>;

    /// `P(event | condition)` for a single-event query.
    fn probability(&self, query: &ConditionalEvent) -> Result<f64>;

    /// Whether every condition block is a proper distribution.
    fn is_distribution(&self) -> bool;

    /// Condition blocks with parameters, ascending.
    fn condition_blocks(&self) -> Vec<EventCatenation>;
}

// =============================================================================
// DISTRIBUTION ENUM
// =============================================================================

/// Any of the probability functions.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Discrete(DiscreteDistribution),
    Uniform(UniformDistribution),
    Gaussian(GaussianDistribution),
    Exponential(ExponentialDistribution),
}

macro_rules! dispatch {
    ($self:ident, $f:ident => $body:expr) => {
        match $self {
            Distribution::Discrete($f) => $body,
            Distribution::Uniform($f) => $body,
            Distribution::Gaussian($f) => $body,
            Distribution::Exponential($f) => $body,
        }
    };
}

impl Distribution {
    /// An untrained function matching the shape of `range`.
    pub fn for_range(name: &str, range: &ValueRange) -> Self {
        match range.continuous_kind() {
            None => Self::Discrete(DiscreteDistribution::new(name, range.clone())),
            Some(ContinuousKind::FloatUniform) => {
                Self::Uniform(UniformDistribution::new(name))
            }
            Some(ContinuousKind::Gaussian) => Self::Gaussian(GaussianDistribution::new(name)),
            Some(ContinuousKind::Exponential) => {
                Self::Exponential(ExponentialDistribution::new(name))
            }
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Discrete(_))
    }

    pub fn as_discrete(&self) -> Option<&DiscreteDistribution> {
        match self {
            Self::Discrete(d) => Some(d),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Discrete(_) => "discrete",
            Self::Uniform(_) => "float_uniform",
            Self::Gaussian(_) => "gaussian",
            Self::Exponential(_) => "exponential",
        }
    }
}

impl ProbabilityFunction for Distribution {
    fn domain(&self) -> &Domain {
        dispatch!(self, f => f.domain())
    }

    fn domain_mut(&mut self) -> &mut Domain {
        dispatch!(self, f => f.domain_mut())
    }

    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        dispatch!(self, f => f.train(samples))
    }

    fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        dispatch!(self, f => f.probability(query))
    }

    fn is_distribution(&self) -> bool {
        dispatch!(self, f => f.is_distribution())
    }

    fn condition_blocks(&self) -> Vec<EventCatenation> {
        dispatch!(self, f => f.condition_blocks())
    }
}
