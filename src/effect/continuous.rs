//! Effect sizes from group summary statistics: mean difference and
//! standardized mean difference (Hedges' g).

use crate::core::errors::Result;
use crate::core::{ContinuousOutcome, EffectEstimate, EffectMeasure};
use crate::effect::confidence;
use crate::effect::validation::{validate_continuous, validate_smd_degrees_of_freedom};
use crate::stats::Z_CRITICAL_95;

/// Raw mean difference with normal-approximation SE and 95% CI.
pub fn mean_difference(outcome: &ContinuousOutcome) -> Result<EffectEstimate> {
    validate_continuous(outcome)?;

    let n_t = outcome.n_treatment as f64;
    let n_c = outcome.n_control as f64;
    let point = outcome.mean_treatment - outcome.mean_control;
    let variance = outcome.sd_treatment.powi(2) / n_t + outcome.sd_control.powi(2) / n_c;
    let se = variance.sqrt();

    Ok(plain_estimate(
        EffectMeasure::MeanDifference,
        point,
        se,
        outcome,
    ))
}

/// Hedges' g: Cohen's d scaled by the small-sample correction factor
/// `J = 1 − 3/(4·(n_t+n_c−2) − 1)`.
pub fn standardized_mean_difference(outcome: &ContinuousOutcome) -> Result<EffectEstimate> {
    validate_continuous(outcome)?;
    validate_smd_degrees_of_freedom(outcome)?;

    let n_t = outcome.n_treatment as f64;
    let n_c = outcome.n_control as f64;
    let df = n_t + n_c - 2.0;

    let pooled_sd = (((n_t - 1.0) * outcome.sd_treatment.powi(2)
        + (n_c - 1.0) * outcome.sd_control.powi(2))
        / df)
        .sqrt();
    let cohen_d = (outcome.mean_treatment - outcome.mean_control) / pooled_sd;
    let correction = 1.0 - 3.0 / (4.0 * df - 1.0);
    let g = cohen_d * correction;

    let total = n_t + n_c;
    let se = (total / (n_t * n_c) + g * g / (2.0 * total)).sqrt();

    Ok(plain_estimate(
        EffectMeasure::StandardizedMeanDifference,
        g,
        se,
        outcome,
    ))
}

fn plain_estimate(
    measure: EffectMeasure,
    point: f64,
    se: f64,
    outcome: &ContinuousOutcome,
) -> EffectEstimate {
    let ci_lower = point - Z_CRITICAL_95 * se;
    let ci_upper = point + Z_CRITICAL_95 * se;
    let variance_ratio = outcome.sd_treatment.powi(2) / outcome.sd_control.powi(2);

    EffectEstimate {
        measure,
        point,
        ci_lower,
        ci_upper,
        standard_error: se,
        log_effect_size: None,
        weight: 1.0 / (se * se),
        log_scale: false,
        continuity_correction_applied: false,
        confidence: confidence::effect_score(
            measure,
            outcome.total_n(),
            ci_lower,
            ci_upper,
            false,
            Some(variance_ratio),
        ),
        warnings: Vec::new(),
    }
}
