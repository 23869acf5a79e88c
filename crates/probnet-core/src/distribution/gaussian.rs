//! # Gaussian Distribution

use super::domain::Domain;
use super::normal::standard_normal_cdf;
use super::{ProbabilityFunction, Sample, float_groups};
use crate::error::{ProbNetError, Result};
use crate::event::{ConditionalEvent, EventCatenation};
use crate::range::{ContinuousKind, ValueRange};
use std::collections::BTreeMap;

/// Normal distribution `(μ, σ)` per condition block.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianDistribution {
    domain: Domain,
    params: BTreeMap<EventCatenation, (f64, f64)>,
}

impl GaussianDistribution {
    pub fn new(name: &str) -> Self {
        Self {
            domain: Domain::for_event(name, ValueRange::continuous(ContinuousKind::Gaussian)),
            params: BTreeMap::new(),
        }
    }

    /// Set `(μ, σ)` for one condition block.
    pub fn set(&mut self, condition: EventCatenation, mean: f64, std_dev: f64) -> Result<()> {
        if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
            return Err(ProbNetError::distribution(format!(
                "N({mean}, {std_dev}) is not a normal distribution"
            )));
        }
        self.params.insert(condition, (mean, std_dev));
        Ok(())
    }

    /// `(μ, σ)` of a condition block.
    pub fn params(&self, condition: &EventCatenation) -> Option<(f64, f64)> {
        self.params.get(condition).copied()
    }

    /// A zero σ degenerates to a step at μ.
    fn cdf(x: f64, mean: f64, std_dev: f64) -> f64 {
        if std_dev == 0.0 {
            return if x >= mean { 1.0 } else { 0.0 };
        }
        standard_normal_cdf((x - mean) / std_dev)
    }
}

impl ProbabilityFunction for GaussianDistribution {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    /// Weighted mean and weighted population variance per block.
    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        let (domain, groups) = float_groups(samples, &self.domain)?;
        let mut params = BTreeMap::new();
        for (condition, values) in groups {
            let total: f64 = values.iter().map(|(_, w)| w).sum();
            if total <= 0.0 {
                continue;
            }
            let mean = values.iter().map(|(x, w)| x * w).sum::<f64>() / total;
            let variance = values
                .iter()
                .map(|(x, w)| w * (x - mean) * (x - mean))
                .sum::<f64>()
                / total;
            params.insert(condition, (mean, variance.sqrt()));
        }
        self.domain = domain;
        self.params = params;
        Ok(())
    }

    /// `Φ((hi − μ)/σ) − Φ((lo − μ)/σ)` over the event's interval.
    fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        self.domain.check_possible(query)?;
        let event = self.domain.single_event(query)?;
        let key = self.domain.parameter_key(query)?;
        let (mean, std_dev) = self.params.get(&key).copied().ok_or_else(|| {
            ProbNetError::distribution(format!("no parameters for condition {key}"))
        })?;
        let (lo, hi) = event.to_float_interval()?.finite_bounds();
        Ok((Self::cdf(hi, mean, std_dev) - Self::cdf(lo, mean, std_dev)).max(0.0))
    }

    fn is_distribution(&self) -> bool {
        !self.params.is_empty()
            && self
                .params
                .values()
                .all(|(m, s)| m.is_finite() && s.is_finite() && *s >= 0.0)
    }

    fn condition_blocks(&self) -> Vec<EventCatenation> {
        self.params.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::variant::Interval;

    #[test]
    fn weighted_fit() {
        let mut g = GaussianDistribution::new("x");
        let samples: Vec<Sample> = [(0.0, 3.0), (1.0, 2.0), (2.0, 1.0)]
            .into_iter()
            .map(|(x, w)| Sample::new(Event::equals("x", x), EventCatenation::new(), w))
            .collect();
        g.train(&samples).expect("train");
        let (mean, std_dev) = g.params(&EventCatenation::new()).expect("params");
        assert!((mean - 2.0 / 3.0).abs() < 1e-12);
        let variance = (3.0 * (2.0_f64 / 3.0).powi(2)
            + 2.0 * (1.0_f64 / 3.0).powi(2)
            + (4.0_f64 / 3.0).powi(2))
            / 6.0;
        assert!((std_dev * std_dev - variance).abs() < 1e-12);
    }

    #[test]
    fn whole_line_has_probability_one() {
        let mut g = GaussianDistribution::new("x");
        g.set(EventCatenation::new(), 1.0, 2.0).expect("set");
        let ce = ConditionalEvent::single(
            Event::element_of("x", Interval::<f64>::full()),
            EventCatenation::new(),
        )
        .expect("query");
        assert!((g.probability(&ce).expect("p") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sigma_is_a_step() {
        let mut g = GaussianDistribution::new("x");
        g.set(EventCatenation::new(), 1.0, 0.0).expect("set");
        let around = ConditionalEvent::single(
            Event::element_of("x", Interval::closed(0.0, 2.0)),
            EventCatenation::new(),
        )
        .expect("query");
        assert_eq!(g.probability(&around).expect("p"), 1.0);
        let beside = ConditionalEvent::single(
            Event::element_of("x", Interval::closed(2.0, 3.0)),
            EventCatenation::new(),
        )
        .expect("query");
        assert_eq!(g.probability(&beside).expect("p"), 0.0);
    }

    #[test]
    fn failed_train_leaves_function_unchanged() {
        let mut g = GaussianDistribution::new("x");
        let good = [1.0, 2.0, 4.0]
            .map(|x| Sample::new(Event::equals("x", x), EventCatenation::new(), 1.0));
        g.train(&good).expect("train");
        let before = g.clone();

        let samples = [
            Sample::new(Event::equals("x", 9.0), EventCatenation::new(), 1.0),
            Sample::new(Event::equals("x", "nine"), EventCatenation::new(), 1.0),
        ];
        g.train(&samples).expect_err("text sample");
        assert_eq!(g, before);
    }
}
