//! Binomial distribution utilities (repeat-survey detection counts).

use occu_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

/// `ln(n choose k)` via log-gamma. Callers guarantee `k <= n`.
fn ln_choose(n: u64, k: u64) -> f64 {
    debug_assert!(k <= n, "ln_choose requires k <= n, got k={k} n={n}");
    let n1 = (n as f64) + 1.0;
    let k1 = (k as f64) + 1.0;
    let nk1 = ((n - k) as f64) + 1.0;
    ln_gamma(n1) - ln_gamma(k1) - ln_gamma(nk1)
}

/// Log-PMF of `Binom(n, p)` at count `k`.
pub fn logpmf(k: u64, n: u64, p: f64) -> Result<f64> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter(format!("p must be finite and in [0,1], got {}", p)));
    }
    if k > n {
        return Err(Error::InvalidParameter(format!("k must be <= n, got k={} n={}", k, n)));
    }

    if p == 0.0 {
        return Ok(if k == 0 { 0.0 } else { f64::NEG_INFINITY });
    }
    if p == 1.0 {
        return Ok(if k == n { 0.0 } else { f64::NEG_INFINITY });
    }
    let kf = k as f64;
    let nf = n as f64;
    Ok(ln_choose(n, k) + kf * p.ln() + (nf - kf) * (-p).ln_1p())
}
