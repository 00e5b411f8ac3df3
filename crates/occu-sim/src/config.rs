//! Simulation configuration: counts, per-covariate effect designations and the
//! normal distributions every draw comes from.

use occu_core::{Error, Result};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Normal distribution parameters `N(mean, sd)`.
///
/// `sd = 0` is allowed and yields the mean on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalSpec {
    /// Location.
    pub mean: f64,
    /// Spread (standard deviation), must be `>= 0`.
    pub sd: f64,
}

impl NormalSpec {
    /// `N(0, 1)`.
    pub const STANDARD: Self = Self { mean: 0.0, sd: 1.0 };

    /// Create a spec; validated lazily by [`SimulationConfig::validate`].
    pub const fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }

    fn validate(&self, what: &str) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "{what}: mean must be finite, got {}",
                self.mean
            )));
        }
        if !self.sd.is_finite() || self.sd < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "{what}: sd must be finite and >= 0, got {}",
                self.sd
            )));
        }
        Ok(())
    }

    pub(crate) fn distribution(&self, what: &str) -> Result<Normal<f64>> {
        self.validate(what)?;
        Normal::new(self.mean, self.sd)
            .map_err(|e| Error::InvalidParameter(format!("{what}: {e}")))
    }
}

impl Default for NormalSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// How a covariate's slope varies across species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// One draw per species.
    Random,
    /// A single draw shared by every species.
    Fixed,
}

/// Effect designation for one covariate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CovariateEffect {
    /// 1-indexed covariate column.
    pub covariate: usize,
    /// Random or fixed.
    pub effect: EffectType,
    /// Distribution the slope(s) are drawn from.
    #[serde(default)]
    pub slope: NormalSpec,
}

impl CovariateEffect {
    /// Random effect on `covariate` with `N(0, 1)` slopes.
    pub fn random(covariate: usize) -> Self {
        Self { covariate, effect: EffectType::Random, slope: NormalSpec::STANDARD }
    }

    /// Fixed effect on `covariate`, slope drawn once from `N(0, 1)`.
    pub fn fixed(covariate: usize) -> Self {
        Self { covariate, effect: EffectType::Fixed, slope: NormalSpec::STANDARD }
    }

    /// Replace the slope distribution.
    pub fn with_slope(mut self, mean: f64, sd: f64) -> Self {
        self.slope = NormalSpec::new(mean, sd);
        self
    }
}

/// Configuration for the synthetic occupancy survey generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of species.
    pub num_species: usize,
    /// Number of sites.
    pub num_sites: usize,
    /// Number of site-level covariates.
    pub num_covariates: usize,
    /// Repeat surveys per site.
    pub num_surveys: u64,
    /// Explicit effect designations. Covariates not listed get a random
    /// effect drawn from `default_slope`.
    #[serde(default)]
    pub effects: Vec<CovariateEffect>,
    /// Species intercepts (logit occupancy at `x = 0`).
    #[serde(default)]
    pub intercept: NormalSpec,
    /// Site covariate entries.
    #[serde(default)]
    pub covariate: NormalSpec,
    /// Slopes for covariates without an explicit entry in `effects`.
    #[serde(default)]
    pub default_slope: NormalSpec,
    /// Species detection logits; detection probability is their sigmoid.
    #[serde(default)]
    pub detection_logit: NormalSpec,
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_species: 20,
            num_sites: 50,
            num_covariates: 3,
            num_surveys: 4,
            effects: vec![CovariateEffect::fixed(1)],
            intercept: NormalSpec::STANDARD,
            covariate: NormalSpec::STANDARD,
            default_slope: NormalSpec::STANDARD,
            detection_logit: NormalSpec::STANDARD,
            seed: default_seed(),
        }
    }
}

impl SimulationConfig {
    /// Config with the given counts, effects and seed; distributions at their defaults.
    pub fn new(
        num_species: usize,
        num_sites: usize,
        num_covariates: usize,
        num_surveys: u64,
        effects: Vec<CovariateEffect>,
        seed: u64,
    ) -> Self {
        Self {
            num_species,
            num_sites,
            num_covariates,
            num_surveys,
            effects,
            seed,
            ..Default::default()
        }
    }

    /// Reject zero counts, out-of-range or duplicated covariate references,
    /// and negative or non-finite distribution parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_species == 0 {
            return Err(Error::InvalidParameter("num_species must be > 0".into()));
        }
        if self.num_sites == 0 {
            return Err(Error::InvalidParameter("num_sites must be > 0".into()));
        }
        if self.num_covariates == 0 {
            return Err(Error::InvalidParameter("num_covariates must be > 0".into()));
        }
        if self.num_surveys == 0 {
            return Err(Error::InvalidParameter("num_surveys must be > 0".into()));
        }
        if self.num_species.checked_mul(self.num_sites).is_none() {
            return Err(Error::InvalidParameter(format!(
                "num_species * num_sites overflows ({} * {})",
                self.num_species, self.num_sites
            )));
        }

        self.intercept.validate("intercept")?;
        self.covariate.validate("covariate")?;
        self.default_slope.validate("default_slope")?;
        self.detection_logit.validate("detection_logit")?;

        let mut seen = vec![false; self.num_covariates];
        for eff in &self.effects {
            if eff.covariate == 0 || eff.covariate > self.num_covariates {
                return Err(Error::InvalidParameter(format!(
                    "effect references covariate {}, valid range is [1, {}]",
                    eff.covariate, self.num_covariates
                )));
            }
            if std::mem::replace(&mut seen[eff.covariate - 1], true) {
                return Err(Error::InvalidParameter(format!(
                    "covariate {} has more than one effect designation",
                    eff.covariate
                )));
            }
            eff.slope.validate(&format!("slope of covariate {}", eff.covariate))?;
        }
        Ok(())
    }

    /// Effect type and slope distribution for every covariate, in column order.
    ///
    /// Call after [`validate`](Self::validate); unknown indices are ignored here.
    pub fn resolved_effects(&self) -> Vec<(EffectType, NormalSpec)> {
        let mut out = vec![(EffectType::Random, self.default_slope); self.num_covariates];
        for eff in &self.effects {
            if let Some(slot) = eff.covariate.checked_sub(1).and_then(|i| out.get_mut(i)) {
                *slot = (eff.effect, eff.slope);
            }
        }
        out
    }
}
