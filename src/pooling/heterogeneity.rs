//! Heterogeneity statistics: Cochran's Q, I², and the DerSimonian-Laird
//! between-study variance τ².
//!
//! Both pooling models report the values computed here against the
//! fixed-effect pooled estimate. That is deliberate: the models must
//! agree on how much heterogeneity exists even though they disagree on
//! how to handle it, so the random-effects model never recomputes Q
//! against its own shrunk estimate.

use crate::core::Heterogeneity;

/// Assess heterogeneity of `effects` around `pooled`, weighted by the
/// fixed-effect (inverse-variance) weights.
pub fn assess(effects: &[f64], weights: &[f64], pooled: f64) -> Heterogeneity {
    debug_assert_eq!(effects.len(), weights.len());

    let k = effects.len();
    let df = k.saturating_sub(1);

    let q: f64 = effects
        .iter()
        .zip(weights.iter())
        .map(|(theta, w)| w * (theta - pooled) * (theta - pooled))
        .sum();

    let i_squared = if q > 0.0 {
        (((q - df as f64) / q) * 100.0).max(0.0)
    } else {
        0.0
    };

    let sum_w: f64 = weights.iter().sum();
    let sum_w_sq: f64 = weights.iter().map(|w| w * w).sum();
    let denom = sum_w - sum_w_sq / sum_w;
    let tau_squared = if df > 0 && denom > 0.0 {
        ((q - df as f64) / denom).max(0.0)
    } else {
        0.0
    };

    Heterogeneity {
        q,
        df,
        i_squared,
        tau_squared,
    }
}
