//! # Bayesian Networks
//!
//! - [`BayesNode`]: one variable with its range and distributions
//! - [`BayesNetwork`]: structure, training and a-priori propagation
//! - Bayes-Ball relevance analysis ([`Relevance`])
//! - exact inference by enumeration

mod bayes_ball;
mod inference;
mod model;
mod node;

pub use bayes_ball::Relevance;
pub use model::{BayesNetwork, NetworkGraph};
pub use node::BayesNode;
