//! Probability building blocks for occusim.
//!
//! - logistic transforms with overflow guards (occupancy / detection links)
//! - Bernoulli and Binomial log-PMFs for the occupancy likelihood

pub mod bernoulli;
pub mod binomial;
pub mod math;
