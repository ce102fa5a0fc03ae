//! Fixed- and random-effects pooling of per-study estimates.
//!
//! `pool_fixed` uses plain inverse-variance weights; `pool_random`
//! applies DerSimonian-Laird, deriving τ² from the fixed-effect pass and
//! reweighting with `1/(varᵢ + τ²)`; `pool_auto` picks the model from I²
//! and records the numeric value that drove the choice.

pub mod heterogeneity;

use im::Vector;
use log::debug;

use crate::core::errors::{Error, Result};
use crate::core::{Heterogeneity, PooledResult, PoolingModel, StudyEffect, StudyWeight};
use crate::effect::confidence;
use crate::stats::{two_tailed_p_value, Z_CRITICAL_95};

/// I² above which `pool_auto` switches to the random-effects model.
pub const AUTO_I_SQUARED_THRESHOLD: f64 = 50.0;

/// One study with a resolved variance, ready for weighting.
struct Prepared {
    study_id: String,
    effect: f64,
    variance: f64,
}

/// Inverse-variance fixed-effect pooling.
pub fn pool_fixed(studies: &[StudyEffect]) -> Result<PooledResult> {
    let prepared = prepare(studies)?;
    Ok(fixed_result(&prepared, None))
}

/// DerSimonian-Laird random-effects pooling.
///
/// The reported heterogeneity block is the one computed during the
/// fixed-effect pass; see [`heterogeneity`] for why it is not recomputed.
pub fn pool_random(studies: &[StudyEffect]) -> Result<PooledResult> {
    let prepared = prepare(studies)?;
    Ok(random_result(&prepared, None))
}

/// Model auto-selection: fixed first, switch to random when I² exceeds
/// [`AUTO_I_SQUARED_THRESHOLD`]. The rationale string states the numeric
/// I² behind the decision.
pub fn pool_auto(studies: &[StudyEffect]) -> Result<PooledResult> {
    let prepared = prepare(studies)?;
    let fixed = fixed_result(&prepared, None);
    let i_squared = fixed.heterogeneity.i_squared;

    if i_squared > AUTO_I_SQUARED_THRESHOLD {
        let rationale = format!(
            "I² = {i_squared:.1}% exceeds the {AUTO_I_SQUARED_THRESHOLD:.0}% threshold; random-effects model selected"
        );
        debug!("pool_auto: {rationale}");
        Ok(random_result(&prepared, Some(rationale)))
    } else {
        let rationale = format!(
            "I² = {i_squared:.1}% is at or below the {AUTO_I_SQUARED_THRESHOLD:.0}% threshold; fixed-effect model retained"
        );
        debug!("pool_auto: {rationale}");
        Ok(PooledResult {
            model_rationale: Some(rationale),
            ..fixed
        })
    }
}

/// Resolve standard errors (deriving from the CI where needed) and
/// collect every per-study violation before failing.
fn prepare(studies: &[StudyEffect]) -> Result<Vec<Prepared>> {
    if studies.is_empty() {
        return Err(Error::insufficient_data(
            "at least one study is required for pooling",
        ));
    }

    let mut violations = Vec::new();
    let mut prepared = Vec::with_capacity(studies.len());

    for study in studies {
        let se = match study.standard_error {
            Some(se) => se,
            None => match (study.ci_lower, study.ci_upper) {
                (Some(lower), Some(upper)) if lower > upper => {
                    violations.push(format!(
                        "study {}: ci_lower ({lower}) exceeds ci_upper ({upper})",
                        study.study_id
                    ));
                    continue;
                }
                (Some(lower), Some(upper)) => (upper - lower) / (2.0 * Z_CRITICAL_95),
                _ => {
                    violations.push(format!(
                        "study {}: neither standard_error nor a ci_lower/ci_upper pair given",
                        study.study_id
                    ));
                    continue;
                }
            },
        };

        if !(se.is_finite() && se > 0.0) {
            violations.push(format!(
                "study {}: standard error must be finite and positive (got {se})",
                study.study_id
            ));
            continue;
        }
        if !study.effect.is_finite() {
            violations.push(format!(
                "study {}: effect must be finite (got {})",
                study.study_id, study.effect
            ));
            continue;
        }

        prepared.push(Prepared {
            study_id: study.study_id.clone(),
            effect: study.effect,
            variance: se * se,
        });
    }

    if violations.is_empty() {
        Ok(prepared)
    } else {
        Err(Error::invalid_data(violations))
    }
}

fn fixed_result(prepared: &[Prepared], rationale: Option<String>) -> PooledResult {
    let weights: Vec<f64> = prepared.iter().map(|s| 1.0 / s.variance).collect();
    let (pooled, se) = weighted_pool(prepared, &weights);

    let effects: Vec<f64> = prepared.iter().map(|s| s.effect).collect();
    let het = heterogeneity::assess(&effects, &weights, pooled);

    build_result(PoolingModel::Fixed, pooled, se, het, prepared, &weights, rationale)
}

fn random_result(prepared: &[Prepared], rationale: Option<String>) -> PooledResult {
    // Fixed-effect pass first: Q, I², τ² all derive from it
    let fixed_weights: Vec<f64> = prepared.iter().map(|s| 1.0 / s.variance).collect();
    let (fixed_pooled, _) = weighted_pool(prepared, &fixed_weights);
    let effects: Vec<f64> = prepared.iter().map(|s| s.effect).collect();
    let het = heterogeneity::assess(&effects, &fixed_weights, fixed_pooled);

    let random_weights: Vec<f64> = prepared
        .iter()
        .map(|s| 1.0 / (s.variance + het.tau_squared))
        .collect();
    let (pooled, se) = weighted_pool(prepared, &random_weights);

    build_result(
        PoolingModel::Random,
        pooled,
        se,
        het,
        prepared,
        &random_weights,
        rationale,
    )
}

fn weighted_pool(prepared: &[Prepared], weights: &[f64]) -> (f64, f64) {
    let sum_w: f64 = weights.iter().sum();
    let sum_we: f64 = prepared
        .iter()
        .zip(weights.iter())
        .map(|(s, w)| s.effect * w)
        .sum();
    (sum_we / sum_w, (1.0 / sum_w).sqrt())
}

fn build_result(
    model: PoolingModel,
    pooled: f64,
    se: f64,
    het: Heterogeneity,
    prepared: &[Prepared],
    weights: &[f64],
    rationale: Option<String>,
) -> PooledResult {
    let z = pooled / se;
    let ci_lower = pooled - Z_CRITICAL_95 * se;
    let ci_upper = pooled + Z_CRITICAL_95 * se;

    let sum_w: f64 = weights.iter().sum();
    let study_weights: Vector<StudyWeight> = prepared
        .iter()
        .zip(weights.iter())
        .map(|(s, w)| StudyWeight {
            study_id: s.study_id.clone(),
            weight_percent: w / sum_w * 100.0,
        })
        .collect();

    let mut warnings = Vec::new();
    if prepared.len() == 1 {
        warnings.push(
            "single study pooled; the result reduces to that study's own estimate".to_string(),
        );
    }
    if model == PoolingModel::Fixed && het.i_squared > AUTO_I_SQUARED_THRESHOLD {
        warnings.push(format!(
            "substantial heterogeneity (I² = {:.1}%) under a fixed-effect model",
            het.i_squared
        ));
    }

    PooledResult {
        model,
        pooled_effect: pooled,
        ci_lower,
        ci_upper,
        standard_error: se,
        z_score: z,
        p_value: two_tailed_p_value(z),
        study_weights,
        heterogeneity: het,
        model_rationale: rationale,
        confidence: confidence::pooled_score(
            prepared.len(),
            het.i_squared,
            model,
            ci_upper - ci_lower,
        ),
        warnings,
    }
}
