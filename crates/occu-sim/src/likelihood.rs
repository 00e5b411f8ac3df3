//! Occupancy likelihood with the latent state marginalized out.
//!
//! For row `i` with species `s`:
//!
//! ```text
//! y > 0 : log psi + log Binom(y | J, p[s])
//! y = 0 : log( psi * (1 - p[s])^J + (1 - psi) )
//! ```
//!
//! Evaluated at known parameters only; no sampling or optimization.

use occu_core::{Error, OccupancyData, Result};
use occu_prob::math::{LOGIT_BOUND, guarded_logit, log_sum_exp2};
use occu_prob::{bernoulli, binomial};

use crate::generator::SpeciesEffects;

fn check_shapes(data: &OccupancyData, effects: &SpeciesEffects) -> Result<()> {
    data.validate()?;
    let n_species = effects.n_species();
    if data.n_species() > n_species {
        return Err(Error::InvalidParameter(format!(
            "data references species {} but only {} have effects",
            data.n_species(),
            n_species
        )));
    }
    if effects.slopes.len() != n_species || effects.detection.len() != n_species {
        return Err(Error::InvalidParameter(
            "intercepts, slopes and detection must have one entry per species".into(),
        ));
    }
    let k = data.n_covariates();
    if let Some(s) = effects.slopes.iter().position(|row| row.len() != k) {
        return Err(Error::InvalidParameter(format!(
            "species {} has {} slopes, data has {} covariates",
            s + 1,
            effects.slopes[s].len(),
            k
        )));
    }
    if let Some(p) = effects.detection.iter().find(|p| !(**p > 0.0 && **p < 1.0)) {
        return Err(Error::InvalidParameter(format!("detection probability {} not in (0,1)", p)));
    }
    Ok(())
}

/// Per-row log-likelihood contributions.
pub fn pointwise_log_likelihood(data: &OccupancyData, effects: &SpeciesEffects) -> Result<Vec<f64>> {
    check_shapes(data, effects)?;

    let mut out = Vec::with_capacity(data.n_obs);
    for row in 0..data.n_obs {
        let s = (data.species[row] - 1) as usize;
        let eta = guarded_logit(effects.linear_predictor(s, &data.x[row]), LOGIT_BOUND)?;
        let log_psi = bernoulli::logpmf_logit(1, eta)?;
        let log_absent = bernoulli::logpmf_logit(0, eta)?;
        let p = effects.detection[s];
        let (y, j) = (data.y[row], data.j[row]);

        let ll = if y > 0 {
            log_psi + binomial::logpmf(y, j, p)?
        } else {
            log_sum_exp2(log_psi + (j as f64) * (-p).ln_1p(), log_absent)
        };
        out.push(ll);
    }
    Ok(out)
}

/// Total log-likelihood of a dataset.
pub fn log_likelihood(data: &OccupancyData, effects: &SpeciesEffects) -> Result<f64> {
    Ok(pointwise_log_likelihood(data, effects)?.iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn one_row(y: u64, j: u64) -> OccupancyData {
        OccupancyData { y: vec![y], species: vec![1], x: vec![vec![0.0]], j: vec![j], n_obs: 1 }
    }

    fn effects(psi_logit: f64, p: f64) -> SpeciesEffects {
        SpeciesEffects { intercepts: vec![psi_logit], slopes: vec![vec![0.3]], detection: vec![p] }
    }

    #[test]
    fn test_zero_count_mixes_absent_and_missed() {
        // psi = 0.5, p = 0.4, J = 3: 0.5 * 0.6^3 + 0.5
        let ll = log_likelihood(&one_row(0, 3), &effects(0.0, 0.4)).unwrap();
        assert_relative_eq!(ll.exp(), 0.5 * 0.216 + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_positive_count() {
        // psi = 0.5, Binom(2 | 3, 0.4) = 3 * 0.16 * 0.6
        let ll = log_likelihood(&one_row(2, 3), &effects(0.0, 0.4)).unwrap();
        assert_relative_eq!(ll.exp(), 0.5 * 0.288, epsilon = 1e-12);
    }

    #[test]
    fn test_probabilities_over_outcomes_sum_to_one() {
        let e = effects(0.7, 0.35);
        let total: f64 =
            (0..=4).map(|y| log_likelihood(&one_row(y, 4), &e).unwrap().exp()).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut e = effects(0.0, 0.4);
        e.slopes[0].push(1.0);
        assert!(log_likelihood(&one_row(0, 3), &e).is_err());
        let e = effects(0.0, 1.0);
        assert!(log_likelihood(&one_row(0, 3), &e).is_err());
    }
}
