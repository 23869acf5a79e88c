//! # Uniform Float Distribution

use super::domain::Domain;
use super::{ProbabilityFunction, Sample, float_groups};
use crate::error::{ProbNetError, Result};
use crate::event::{ConditionalEvent, EventCatenation};
use crate::range::{ContinuousKind, ValueRange};
use std::collections::BTreeMap;

/// Uniform density on `[low, high]` per condition block.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDistribution {
    domain: Domain,
    bounds: BTreeMap<EventCatenation, (f64, f64)>,
}

impl UniformDistribution {
    pub fn new(name: &str) -> Self {
        Self {
            domain: Domain::for_event(name, ValueRange::continuous(ContinuousKind::FloatUniform)),
            bounds: BTreeMap::new(),
        }
    }

    /// Set the support for one condition block.
    pub fn set(&mut self, condition: EventCatenation, low: f64, high: f64) -> Result<()> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ProbNetError::distribution(format!(
                "[{low}, {high}] is not a uniform support"
            )));
        }
        self.bounds.insert(condition, (low, high));
        Ok(())
    }

    pub fn bounds(&self, condition: &EventCatenation) -> Option<(f64, f64)> {
        self.bounds.get(condition).copied()
    }
}

impl ProbabilityFunction for UniformDistribution {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    /// Observed min and max per block, each side widened by
    /// `1 / occurrences`. Zero-weight samples are ignored.
    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        let (domain, groups) = float_groups(samples, &self.domain)?;
        let mut bounds = BTreeMap::new();
        for (condition, values) in groups {
            let observed: Vec<f64> = values
                .iter()
                .filter(|(_, w)| *w > 0.0)
                .map(|(x, _)| *x)
                .collect();
            if observed.is_empty() {
                continue;
            }
            let pad = 1.0 / observed.len() as f64;
            let low = observed.iter().copied().fold(f64::INFINITY, f64::min) - pad;
            let high = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max) + pad;
            bounds.insert(condition, (low, high));
        }
        self.domain = domain;
        self.bounds = bounds;
        Ok(())
    }

    /// Length of the event interval clipped to the support, over the
    /// support's length.
    fn probability(&self, query: &ConditionalEvent) -> Result<f64> {
        self.domain.check_possible(query)?;
        let event = self.domain.single_event(query)?;
        let key = self.domain.parameter_key(query)?;
        let (low, high) = self.bounds.get(&key).copied().ok_or_else(|| {
            ProbNetError::distribution(format!("no parameters for condition {key}"))
        })?;
        let (a, b) = event.to_float_interval()?.finite_bounds();
        let lo = a.max(low);
        let hi = b.min(high);
        if hi <= lo {
            return Ok(0.0);
        }
        Ok((hi - lo) / (high - low))
    }

    fn is_distribution(&self) -> bool {
        !self.bounds.is_empty()
            && self
                .bounds
                .values()
                .all(|(l, h)| l.is_finite() && h.is_finite() && l < h)
    }

    fn condition_blocks(&self) -> Vec<EventCatenation> {
        self.bounds.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::variant::{Interval, MatchOp};

    fn sample(x: f64) -> Sample {
        Sample::new(Event::equals("T", x), EventCatenation::new(), 1.0)
    }

    fn query(event: Event) -> ConditionalEvent {
        ConditionalEvent::single(event, EventCatenation::new()).expect("query")
    }

    #[test]
    fn training_widens_by_inverse_count() {
        let mut u = UniformDistribution::new("T");
        u.train(&[sample(1.0), sample(3.0)]).expect("train");
        assert_eq!(u.bounds(&EventCatenation::new()), Some((0.5, 3.5)));
        assert!(u.is_distribution());
    }

    #[test]
    fn single_observation_is_not_singular() {
        let mut u = UniformDistribution::new("T");
        u.train(&[sample(2.0)]).expect("train");
        assert_eq!(u.bounds(&EventCatenation::new()), Some((1.0, 3.0)));
    }

    #[test]
    fn probability_is_clipped_length_ratio() {
        let mut u = UniformDistribution::new("T");
        u.set(EventCatenation::new(), 0.0, 4.0).expect("set");
        let p = u
            .probability(&query(Event::element_of("T", Interval::closed(1.0, 2.0))))
            .expect("p");
        assert!((p - 0.25).abs() < 1e-12);

        let p = u
            .probability(&query(Event::element_of("T", Interval::closed(3.0, 10.0))))
            .expect("p");
        assert!((p - 0.25).abs() < 1e-12);

        let p = u
            .probability(&query(Event::new("T", 1.0, MatchOp::Less)))
            .expect("p");
        assert!((p - 0.25).abs() < 1e-12);

        let p = u
            .probability(&query(Event::new("T", 1.0, MatchOp::GreaterEqual)))
            .expect("p");
        assert!((p - 0.75).abs() < 1e-12);

        let p = u
            .probability(&query(Event::element_of("T", Interval::closed(5.0, 6.0))))
            .expect("p");
        assert_eq!(p, 0.0);
    }

    #[test]
    fn degenerate_support_rejected() {
        let mut u = UniformDistribution::new("T");
        assert!(u.set(EventCatenation::new(), 1.0, 1.0).is_err());
    }

    #[test]
    fn failed_train_leaves_function_unchanged() {
        let mut u = UniformDistribution::new("T");
        u.train(&[sample(1.0), sample(3.0)]).expect("train");
        let before = u.clone();

        let bad_weight = Sample::new(Event::equals("T", 2.0), EventCatenation::new(), -1.0);
        u.train(&[sample(8.0), bad_weight]).expect_err("negative weight");
        assert_eq!(u, before);

        let text = Sample::new(Event::equals("T", "warm"), EventCatenation::new(), 1.0);
        u.train(&[sample(8.0), text]).expect_err("text sample");
        assert_eq!(u, before);
    }
}
