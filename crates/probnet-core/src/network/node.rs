//! # Network Nodes

use crate::distribution::{Distribution, ProbabilityFunction};
use crate::error::{ProbNetError, Result};
use crate::range::ValueRange;

/// One random variable of a Bayesian network.
///
/// A node owns its value range, its conditional distribution given its
/// parents, and the a-priori marginal once propagation has run.
#[derive(Debug, Clone, PartialEq)]
pub struct BayesNode {
    name: String,
    description: String,
    range: ValueRange,
    distribution: Distribution,
    apriori: Option<Distribution>,
}

impl BayesNode {
    /// A node with an empty enumerated range and an untrained table.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_range(name, ValueRange::new())
    }

    pub fn with_range(name: impl Into<String>, range: ValueRange) -> Self {
        let name = name.into();
        let distribution = Distribution::for_range(&name, &range);
        Self {
            name,
            description: String::new(),
            range,
            distribution,
            apriori: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn range(&self) -> &ValueRange {
        &self.range
    }

    /// Replace the range. The distribution is reset to an untrained one of
    /// the matching family.
    pub fn set_range(&mut self, range: ValueRange) {
        self.distribution = Distribution::for_range(&self.name, &range);
        self.range = range;
        self.apriori = None;
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Install a distribution over this node's variable.
    pub fn set_distribution(&mut self, distribution: Distribution) -> Result<()> {
        let event = distribution.domain().event_name()?;
        if event != self.name {
            return Err(ProbNetError::distribution(format!(
                "distribution over '{event}' cannot belong to node '{}'",
                self.name
            )));
        }
        self.distribution = distribution;
        self.apriori = None;
        Ok(())
    }

    /// Marginal of this node, when it has been propagated.
    pub fn apriori(&self) -> Option<&Distribution> {
        self.apriori.as_ref()
    }

    pub(crate) fn set_apriori(&mut self, apriori: Option<Distribution>) {
        self.apriori = apriori;
    }

    pub fn is_continuous(&self) -> bool {
        self.range.is_continuous()
    }

    /// Whether the node can answer queries: a non-empty range and a
    /// distribution that is proper under every condition.
    pub fn fully_defined(&self) -> bool {
        !self.range.is_empty() && self.distribution.is_distribution()
    }
}
