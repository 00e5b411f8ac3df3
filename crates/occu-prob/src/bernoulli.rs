//! Bernoulli distribution utilities (latent occupancy state).

use crate::math::log_sigmoid;
use occu_core::{Error, Result};

/// Log-PMF of `Bernoulli(sigmoid(logit_p))` at `k ∈ {0, 1}`.
pub fn logpmf_logit(k: u8, logit_p: f64) -> Result<f64> {
    if !logit_p.is_finite() {
        return Err(Error::InvalidParameter(format!("logit_p must be finite, got {}", logit_p)));
    }
    match k {
        0 => Ok(log_sigmoid(-logit_p)),
        1 => Ok(log_sigmoid(logit_p)),
        _ => Err(Error::InvalidParameter(format!("k must be 0 or 1, got {}", k))),
    }
}
