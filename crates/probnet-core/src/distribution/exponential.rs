//! # Exponential Distribution

use super::domain::Domain;
use super::{ProbabilityFunction, Sample, float_groups};
use crate::error::{EventRangeKind, ProbNetError, Result};
use crate::event::{ConditionalEvent, EventCatenation};
use crate::range::{ContinuousKind, ValueRange};
use std::collections::BTreeMap;

/// Exponential distribution with parameter `λ` per condition block and
/// CDF `1 − exp(−λx)` on `x ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialDistribution {
    domain: Domain,
    lambdas: BTreeMap<EventCatenation, f64>,
}

impl ExponentialDistribution {
    pub fn new(name: &str) -> Self {
        Self {
            domain: Domain::for_event(name, ValueRange::continuous(ContinuousKind::Exponential)),
            lambdas: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, condition: EventCatenation, lambda: f64) -> Result<()> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(ProbNetError::distribution(format!(
                "lambda {lambda} must be positive"
            )));
        }
        self.lambdas.insert(condition, lambda);
        Ok(())
    }

    pub fn lambda(&self, condition: &EventCatenation) -> Option<f64> {
        self.lambdas.get(condition).copied()
    }

    fn cdf(x: f64, lambda: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        1.0 - (-lambda * x).exp()
    }
}

impl ProbabilityFunction for ExponentialDistribution {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    /// `λ` is the weighted sample mean of each block. Negative samples
    /// are outside the support and fail.
    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        let (domain, groups) = float_groups(samples, &self.domain)?;
        let mut lambdas = BTreeMap::new();
        for (condition, values) in groups {
            if let Some((x, _)) = values.iter().find(|(x, _)| *x < 0.0) {
                return Err(ProbNetError::event_range(EventRangeKind::ExponentialRange, x));
            }
            let total: f64 = values.iter().map(|(_, w)| w).sum();
            if total <= 0.0 {
                continue;
            }
            let lambda = values.iter().map(|(x, w)| x * w).sum::<f64>() / total;
            if lambda <= 0.0 {
                return Err(ProbNetError::distribution(format!(
                    "samples under {condition} give a non-positive lambda"
                )));
            }
            lambdas.insert(condition, lambda);
        }
        self.domain = domain;
        self.lambdas = lambdas;
        Ok(())
    }

    /// `F(hi) − F(lo)` with `F(x) = 0` below zero.
    fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        self.domain.check_possible(query)?;
        let event = self.domain.single_event(query)?;
        let key = self.domain.parameter_key(query)?;
        let lambda = self.lambdas.get(&key).copied().ok_or_else(|| {
            ProbNetError::distribution(format!("no parameters for condition {key}"))
        })?;
        let (lo, hi) = event.to_float_interval()?.finite_bounds();
        Ok((Self::cdf(hi, lambda) - Self::cdf(lo, lambda)).max(0.0))
    }

    fn is_distribution(&self) -> bool {
        !self.lambdas.is_empty() && self.lambdas.values().all(|l| l.is_finite() && *l > 0.0)
    }

    fn condition_blocks(&self) -> Vec<EventCatenation> {
        self.lambdas.keys().cloned().collect()
    }
}
