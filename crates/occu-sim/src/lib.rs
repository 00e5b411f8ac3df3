//! # occu-sim
//!
//! Synthetic data for hierarchical multi-species occupancy models with
//! imperfect detection.
//!
//! The generator draws species intercepts, a site covariate matrix, mixed
//! fixed/random slopes and detection probabilities, then latent occupancy
//! and repeat-survey detection counts. Output is the long-format
//! [`OccupancyData`](occu_core::OccupancyData) table an external MCMC engine
//! consumes, plus the [`OccupancyTruth`] for recovery checks.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Counts, effect designations and distribution parameters.
pub mod config;
/// The generator itself.
pub mod generator;
/// Marginal occupancy likelihood at known parameters.
pub mod likelihood;
/// Seeded replicate datasets.
pub mod replicates;
/// Naive vs. true occupancy summaries.
pub mod summary;

pub use config::{CovariateEffect, EffectType, NormalSpec, SimulationConfig};
pub use generator::{
    OccupancyTruth, Simulation, SpeciesEffects, generate, generate_occupancy_dataset,
    generate_with_rng,
};
pub use likelihood::{log_likelihood, pointwise_log_likelihood};
pub use replicates::{Replicate, generate_replicates};
pub use summary::{DatasetSummary, SpeciesSummary, summarize};
