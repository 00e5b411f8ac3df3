//! Synthetic multi-species occupancy survey generator.
//!
//! The data-generating process, for species `s` and site `i`:
//!
//! ```text
//! eta[s,i] = alpha[s] + sum_k beta[s,k] * x[i,k]
//! z[s,i]   ~ Bernoulli(sigmoid(eta[s,i]))
//! Y[s,i]   ~ Binomial(J, p[s] * z[s,i])
//! ```
//!
//! Draw order is fixed (intercepts, covariates, slopes, detection, then the
//! species-major occupancy/detection pass), so a seed fully determines the
//! output.

use occu_core::{Error, OccupancyData, Result};
use occu_prob::math::{DETECTION_LOGIT_BOUND, LOGIT_BOUND, guarded_sigmoid};
use rand::distr::Bernoulli;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};
use serde::{Deserialize, Serialize};

use crate::config::{CovariateEffect, EffectType, SimulationConfig};

/// Per-species parameters of the occupancy and detection submodels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEffects {
    /// Occupancy intercept per species (logit scale).
    pub intercepts: Vec<f64>,
    /// Slope matrix, `species × covariates`.
    pub slopes: Vec<Vec<f64>>,
    /// Per-survey detection probability per species, in (0, 1).
    pub detection: Vec<f64>,
}

impl SpeciesEffects {
    /// Number of species.
    pub fn n_species(&self) -> usize {
        self.intercepts.len()
    }

    /// `alpha[s] + beta[s] · x` for a 0-indexed species.
    pub fn linear_predictor(&self, species: usize, x: &[f64]) -> f64 {
        self.intercepts[species]
            + self.slopes[species].iter().zip(x).map(|(b, xv)| b * xv).sum::<f64>()
    }

    /// Slope column for a 0-indexed covariate.
    pub fn slope_column(&self, covariate: usize) -> Vec<f64> {
        self.slopes.iter().map(|row| row[covariate]).collect()
    }
}

/// Hidden quantities behind a generated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyTruth {
    /// Species effects the data were drawn from.
    pub effects: SpeciesEffects,
    /// Site covariate matrix, `sites × covariates`.
    pub covariates: Vec<Vec<f64>>,
    /// Occupancy probability per long-format row.
    pub psi: Vec<f64>,
    /// Latent occupancy per long-format row (0 or 1).
    pub z: Vec<u8>,
}

/// A generated dataset together with the truth it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Long-format data for the inference engine.
    pub data: OccupancyData,
    /// Parameters and latent states.
    pub truth: OccupancyTruth,
}

/// Generate a dataset from explicit counts and effect designations, with
/// default distribution parameters.
pub fn generate(
    num_species: usize,
    num_sites: usize,
    num_covariates: usize,
    num_surveys: u64,
    effects: &[CovariateEffect],
    seed: u64,
) -> Result<Simulation> {
    let config = SimulationConfig::new(
        num_species,
        num_sites,
        num_covariates,
        num_surveys,
        effects.to_vec(),
        seed,
    );
    generate_occupancy_dataset(&config)
}

/// Generate a dataset seeded from `config.seed`.
pub fn generate_occupancy_dataset(config: &SimulationConfig) -> Result<Simulation> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    generate_with_rng(config, &mut rng)
}

/// Generate a dataset drawing from the caller's random source.
///
/// `config.seed` is ignored. Fails before returning anything if the config
/// is invalid or a linear predictor is not finite.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Simulation> {
    config.validate()?;

    let n_species = config.num_species;
    let n_sites = config.num_sites;
    let n_cov = config.num_covariates;
    let n_surveys = config.num_surveys;

    let (effects, covariates) = draw_species_effects(config, rng)?;
    tracing::debug!(n_species, n_sites, n_cov, "drew species effects and covariates");

    let n_obs = n_species * n_sites;
    let mut y = vec![0u64; n_obs];
    let mut species = vec![0u64; n_obs];
    let mut x = Vec::with_capacity(n_obs);
    let j = vec![n_surveys; n_obs];
    let mut psi = vec![0.0; n_obs];
    let mut z = vec![0u8; n_obs];

    for s in 0..n_species {
        let p_detect = effects.detection[s];
        for (i, site_x) in covariates.iter().enumerate() {
            let row = s * n_sites + i;
            let eta = effects.linear_predictor(s, site_x);
            let p_occ = guarded_sigmoid(eta, LOGIT_BOUND).map_err(|e| {
                Error::NumericOverflow(format!("species {} site {}: {}", s + 1, i + 1, e))
            })?;

            let occupied = Bernoulli::new(p_occ)
                .map_err(|e| Error::NumericOverflow(format!("psi={p_occ}: {e}")))?
                .sample(rng);
            let z_si: u8 = if occupied { 1 } else { 0 };

            // Absent species are never detected: p * z = 0.
            let p_obs = p_detect * f64::from(z_si);
            let count = Binomial::new(n_surveys, p_obs)
                .map_err(|e| Error::NumericOverflow(format!("p={p_obs}: {e}")))?
                .sample(rng);
            debug_assert!(count <= n_surveys);

            y[row] = count;
            species[row] = (s + 1) as u64;
            x.push(site_x.clone());
            psi[row] = p_occ;
            z[row] = z_si;
        }
    }

    let data = OccupancyData { y, species, x, j, n_obs };
    tracing::info!(
        n_obs,
        n_occupied = z.iter().filter(|&&v| v == 1).count(),
        n_detected = data.y.iter().filter(|&&v| v > 0).count(),
        "generated occupancy dataset"
    );

    Ok(Simulation { data, truth: OccupancyTruth { effects, covariates, psi, z } })
}

/// Steps 1-4: intercepts, covariate matrix, slopes, detection probabilities.
fn draw_species_effects<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<(SpeciesEffects, Vec<Vec<f64>>)> {
    let n_species = config.num_species;
    let n_cov = config.num_covariates;

    let intercept = config.intercept.distribution("intercept")?;
    let intercepts: Vec<f64> = (0..n_species).map(|_| intercept.sample(rng)).collect();

    let cov = config.covariate.distribution("covariate")?;
    let mut covariates = Vec::with_capacity(config.num_sites);
    for _ in 0..config.num_sites {
        let row: Vec<f64> = (0..n_cov).map(|_| cov.sample(rng)).collect();
        covariates.push(row);
    }

    let mut slopes = vec![vec![0.0; n_cov]; n_species];
    for (k, (effect, spec)) in config.resolved_effects().into_iter().enumerate() {
        let dist = spec.distribution(&format!("slope of covariate {}", k + 1))?;
        match effect {
            EffectType::Random => {
                for row in slopes.iter_mut() {
                    row[k] = dist.sample(rng);
                }
            }
            EffectType::Fixed => {
                let shared = dist.sample(rng);
                for row in slopes.iter_mut() {
                    row[k] = shared;
                }
            }
        }
    }

    let det = config.detection_logit.distribution("detection_logit")?;
    let mut detection = Vec::with_capacity(n_species);
    for s in 0..n_species {
        let p = guarded_sigmoid(det.sample(rng), DETECTION_LOGIT_BOUND).map_err(|e| {
            Error::NumericOverflow(format!("detection logit of species {}: {}", s + 1, e))
        })?;
        detection.push(p);
    }

    Ok((SpeciesEffects { intercepts, slopes, detection }, covariates))
}
