//! Logistic-link helpers shared by the generator and the likelihood.

use occu_core::{Error, Result};

/// Linear predictors are clamped to `[-LOGIT_BOUND, LOGIT_BOUND]` before the
/// logistic transform. `exp(-700)` is still a normal `f64`.
pub const LOGIT_BOUND: f64 = 700.0;

/// Bound on detection logits. `sigmoid(30) = 1 - 9.4e-14`, so the
/// resulting probability stays strictly inside (0, 1).
pub const DETECTION_LOGIT_BOUND: f64 = 30.0;

/// Stable sigmoid: `1 / (1 + exp(-x))`, one `exp(-|x|)` regardless of sign.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    let recip = 1.0 / (1.0 + e);
    if x >= 0.0 { recip } else { e * recip }
}

/// Stable `log(sigmoid(x))`.
#[inline]
pub fn log_sigmoid(x: f64) -> f64 {
    if x >= 0.0 { -(-x).exp().ln_1p() } else { x - x.exp().ln_1p() }
}

/// Inverse of [`sigmoid`]. Requires `p` in (0, 1).
pub fn logit(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::InvalidParameter(format!("p must be in (0,1), got {}", p)));
    }
    Ok((p / (1.0 - p)).ln())
}

/// `log(exp(a) + exp(b))` without overflow. Handles `-inf` operands.
#[inline]
pub fn log_sum_exp2(a: f64, b: f64) -> f64 {
    let m = a.max(b);
    if m == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    m + ((a - m).exp() + (b - m).exp()).ln()
}

/// Logistic transform of a linear predictor with the overflow guard applied.
///
/// Non-finite input is an error; finite input is clamped to `±bound`.
pub fn guarded_sigmoid(eta: f64, bound: f64) -> Result<f64> {
    Ok(sigmoid(guarded_logit(eta, bound)?))
}

/// Clamp a finite logit to `±bound`, rejecting NaN and infinities.
pub fn guarded_logit(eta: f64, bound: f64) -> Result<f64> {
    if !eta.is_finite() {
        return Err(Error::NumericOverflow(format!(
            "linear predictor is not finite ({})",
            eta
        )));
    }
    Ok(eta.clamp(-bound, bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sigmoid_bounds_and_symmetry() {
        let xs: [f64; 7] = [-50.0, -10.0, -1.0, 0.0, 1.0, 10.0, 50.0];
        for x in xs {
            let s = sigmoid(x);
            assert!((0.0..=1.0).contains(&s), "sigmoid({})={}", x, s);
            assert!((s + sigmoid(-x) - 1.0).abs() < 1e-15, "symmetry failed at {}", x);
        }
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_log_sigmoid_matches_naive() {
        for x in [-10.0, -2.0, -0.1, 0.0, 0.1, 2.0, 10.0] {
            assert_relative_eq!(log_sigmoid(x), sigmoid(x).ln(), epsilon = 1e-12);
        }
        assert!(log_sigmoid(-1e6).is_finite());
    }

    #[test]
    fn test_logit_inverts_sigmoid() {
        for x in [-8.0, -0.5, 0.0, 1.25, 6.0] {
            assert_relative_eq!(logit(sigmoid(x)).unwrap(), x, epsilon = 1e-9);
        }
        assert!(logit(0.0).is_err());
        assert!(logit(1.0).is_err());
        assert!(logit(f64::NAN).is_err());
    }

    #[test]
    fn test_log_sum_exp2() {
        assert_relative_eq!(log_sum_exp2(0.0, 0.0), 2.0_f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(log_sum_exp2(1000.0, 0.0), 1000.0, epsilon = 1e-12);
        assert_eq!(log_sum_exp2(f64::NEG_INFINITY, -3.0), -3.0);
        assert_eq!(log_sum_exp2(f64::NEG_INFINITY, f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_guarded_sigmoid() {
        let p = guarded_sigmoid(1e9, LOGIT_BOUND).unwrap();
        assert!(p.is_finite() && p <= 1.0);
        let q = guarded_sigmoid(-1e9, LOGIT_BOUND).unwrap();
        assert!(q > 0.0, "clamped lower tail should not underflow to 0");
        assert!(matches!(guarded_sigmoid(f64::INFINITY, LOGIT_BOUND), Err(Error::NumericOverflow(_))));
        assert!(matches!(guarded_sigmoid(f64::NAN, LOGIT_BOUND), Err(Error::NumericOverflow(_))));
    }

    #[test]
    fn test_detection_bound_is_strict() {
        let hi = guarded_sigmoid(1e6, DETECTION_LOGIT_BOUND).unwrap();
        let lo = guarded_sigmoid(-1e6, DETECTION_LOGIT_BOUND).unwrap();
        assert!(hi < 1.0 && lo > 0.0);
    }
}
