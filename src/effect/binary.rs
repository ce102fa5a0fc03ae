//! Effect sizes from 2×2 tables: odds ratio, risk ratio, risk difference.

use log::warn;

use crate::core::errors::{Error, Result};
use crate::core::{BinaryOutcome, EffectEstimate, EffectMeasure};
use crate::effect::confidence;
use crate::effect::validation::validate_binary;
use crate::stats::Z_CRITICAL_95;

/// The four table cells as floats, optionally continuity-corrected.
/// `a`/`b` are treatment events/non-events, `c`/`d` the control arm.
struct Cells {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Cells {
    fn from_outcome(outcome: &BinaryOutcome, correction: f64) -> Self {
        Self {
            a: outcome.events_treatment as f64 + correction,
            b: (outcome.total_treatment - outcome.events_treatment) as f64 + correction,
            c: outcome.events_control as f64 + correction,
            d: (outcome.total_control - outcome.events_control) as f64 + correction,
        }
    }
}

/// Odds ratio with log-scale SE and 95% CI.
///
/// When any cell is zero, 0.5 is added to all four cells before the point
/// estimate, log, and SE are computed; the estimate is flagged and a
/// warning emitted.
pub fn odds_ratio(outcome: &BinaryOutcome) -> Result<EffectEstimate> {
    validate_binary(outcome)?;

    let (cells, corrected, warnings) = corrected_cells(outcome, "odds ratio");
    let log_or = ((cells.a * cells.d) / (cells.b * cells.c)).ln();
    let log_se =
        (1.0 / cells.a + 1.0 / cells.b + 1.0 / cells.c + 1.0 / cells.d).sqrt();

    Ok(ratio_estimate(
        EffectMeasure::OddsRatio,
        log_or,
        log_se,
        corrected,
        outcome,
        warnings,
    ))
}

/// Risk ratio with log-scale SE and 95% CI.
///
/// Continuity correction follows the same zero-cell rule as the odds
/// ratio; arm totals are recomputed from the corrected cells.
pub fn risk_ratio(outcome: &BinaryOutcome) -> Result<EffectEstimate> {
    validate_binary(outcome)?;

    let (cells, corrected, warnings) = corrected_cells(outcome, "risk ratio");
    let n_t = cells.a + cells.b;
    let n_c = cells.c + cells.d;
    let log_rr = ((cells.a / n_t) / (cells.c / n_c)).ln();
    let log_se = (1.0 / cells.a - 1.0 / n_t + 1.0 / cells.c - 1.0 / n_c).sqrt();

    Ok(ratio_estimate(
        EffectMeasure::RiskRatio,
        log_rr,
        log_se,
        corrected,
        outcome,
        warnings,
    ))
}

/// Risk difference with normal-approximation SE and 95% CI.
///
/// Never continuity-corrected; a zero cell only produces a warning. A
/// table where both arms are fully degenerate (0% or 100% events on each
/// side) has zero sampling variance and is rejected so downstream pooling
/// never sees an infinite weight.
pub fn risk_difference(outcome: &BinaryOutcome) -> Result<EffectEstimate> {
    validate_binary(outcome)?;

    let mut warnings = Vec::new();
    if outcome.has_zero_cell() {
        let message =
            "zero cell in 2x2 table; risk difference computed without continuity correction"
                .to_string();
        warn!("{message}");
        warnings.push(message);
    }

    let n_t = outcome.total_treatment as f64;
    let n_c = outcome.total_control as f64;
    let p_t = outcome.events_treatment as f64 / n_t;
    let p_c = outcome.events_control as f64 / n_c;

    let variance = p_t * (1.0 - p_t) / n_t + p_c * (1.0 - p_c) / n_c;
    if variance <= 0.0 {
        return Err(Error::invalid_data(vec![
            "risk difference has zero sampling variance (all or no events in both arms)"
                .to_string(),
        ]));
    }

    let point = p_t - p_c;
    let se = variance.sqrt();
    let ci_lower = point - Z_CRITICAL_95 * se;
    let ci_upper = point + Z_CRITICAL_95 * se;
    let total_n = outcome.total_treatment + outcome.total_control;

    Ok(EffectEstimate {
        measure: EffectMeasure::RiskDifference,
        point,
        ci_lower,
        ci_upper,
        standard_error: se,
        log_effect_size: None,
        weight: 1.0 / variance,
        log_scale: false,
        continuity_correction_applied: false,
        confidence: confidence::effect_score(
            EffectMeasure::RiskDifference,
            total_n,
            ci_lower,
            ci_upper,
            false,
            None,
        ),
        warnings,
    })
}

fn corrected_cells(outcome: &BinaryOutcome, measure_name: &str) -> (Cells, bool, Vec<String>) {
    let mut warnings = Vec::new();
    let corrected = outcome.has_zero_cell();
    let correction = if corrected { 0.5 } else { 0.0 };
    if corrected {
        let message = format!(
            "zero cell in 2x2 table; 0.5 continuity correction applied to all cells for {measure_name}"
        );
        warn!("{message}");
        warnings.push(message);
    }
    (Cells::from_outcome(outcome, correction), corrected, warnings)
}

fn ratio_estimate(
    measure: EffectMeasure,
    log_point: f64,
    log_se: f64,
    corrected: bool,
    outcome: &BinaryOutcome,
    warnings: Vec<String>,
) -> EffectEstimate {
    let point = log_point.exp();
    let ci_lower = (log_point - Z_CRITICAL_95 * log_se).exp();
    let ci_upper = (log_point + Z_CRITICAL_95 * log_se).exp();
    let total_n = outcome.total_treatment + outcome.total_control;

    EffectEstimate {
        measure,
        point,
        ci_lower,
        ci_upper,
        standard_error: log_se,
        log_effect_size: Some(log_point),
        weight: 1.0 / (log_se * log_se),
        log_scale: true,
        continuity_correction_applied: corrected,
        confidence: confidence::effect_score(
            measure, total_n, ci_lower, ci_upper, corrected, None,
        ),
        warnings,
    }
}
