//! Advisory confidence scoring.
//!
//! These scores grade how much an estimate should be trusted for
//! screening and triage. They are additive heuristics bounded to
//! [0.1, 0.9] — NOT calibrated statistical quantities, and in particular
//! not a proxy for a p-value or statistical power. Treat them as
//! reviewer-facing metadata only.

use crate::core::{EffectMeasure, PoolingModel};

const BASE_SCORE: f64 = 0.7;
const MIN_SCORE: f64 = 0.1;
const MAX_SCORE: f64 = 0.9;

/// Score a single-study effect estimate.
///
/// Penalties: small total N (−0.2 under 30, −0.1 under 100), imprecise CI
/// (−0.1; ratio > 10 for ratio measures, width > 2 for SMD, width > 0.5
/// for RD/MD), continuity correction (−0.1), and unequal arm variances
/// (−0.1 when the ratio falls outside [0.5, 2]; continuous only).
pub fn effect_score(
    measure: EffectMeasure,
    total_n: u32,
    ci_lower: f64,
    ci_upper: f64,
    continuity_correction_applied: bool,
    variance_ratio: Option<f64>,
) -> f64 {
    let mut score = BASE_SCORE;

    if total_n < 30 {
        score -= 0.2;
    } else if total_n < 100 {
        score -= 0.1;
    }

    if ci_is_wide(measure, ci_lower, ci_upper) {
        score -= 0.1;
    }

    if continuity_correction_applied {
        score -= 0.1;
    }

    if let Some(ratio) = variance_ratio {
        if ratio > 2.0 || ratio < 0.5 {
            score -= 0.1;
        }
    }

    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn ci_is_wide(measure: EffectMeasure, ci_lower: f64, ci_upper: f64) -> bool {
    match measure {
        EffectMeasure::OddsRatio | EffectMeasure::RiskRatio => {
            ci_lower > 0.0 && ci_upper / ci_lower > 10.0
        }
        EffectMeasure::StandardizedMeanDifference => ci_upper - ci_lower > 2.0,
        EffectMeasure::RiskDifference | EffectMeasure::MeanDifference => {
            ci_upper - ci_lower > 0.5
        }
    }
}

/// Score a pooled result.
///
/// Penalties: few studies (−0.2 under 3, −0.1 under 5), high I² under the
/// fixed model only (−0.2 above 75%, −0.1 above 50%; the random model is
/// built to absorb heterogeneity and is not penalized for it), and a wide
/// pooled CI (−0.1 when the width exceeds 1.0 on the pooling scale).
pub fn pooled_score(
    study_count: usize,
    i_squared: f64,
    model: PoolingModel,
    ci_width: f64,
) -> f64 {
    let mut score = BASE_SCORE;

    if study_count < 3 {
        score -= 0.2;
    } else if study_count < 5 {
        score -= 0.1;
    }

    if model == PoolingModel::Fixed {
        if i_squared > 75.0 {
            score -= 0.2;
        } else if i_squared > 50.0 {
            score -= 0.1;
        }
    }

    if ci_width > 1.0 {
        score -= 0.1;
    }

    score.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_precise_study_keeps_base_score() {
        let score = effect_score(EffectMeasure::OddsRatio, 500, 0.8, 1.5, false, None);
        assert_eq!(score, 0.7);
    }

    #[test]
    fn small_n_bands() {
        let tiny = effect_score(EffectMeasure::MeanDifference, 20, 0.0, 0.2, false, Some(1.0));
        let small = effect_score(EffectMeasure::MeanDifference, 50, 0.0, 0.2, false, Some(1.0));
        let large = effect_score(EffectMeasure::MeanDifference, 200, 0.0, 0.2, false, Some(1.0));
        assert!((tiny - 0.5).abs() < 1e-12);
        assert!((small - 0.6).abs() < 1e-12);
        assert!((large - 0.7).abs() < 1e-12);
    }

    #[test]
    fn wide_ci_penalized_per_measure() {
        // Ratio > 10 for OR
        let wide_or = effect_score(EffectMeasure::OddsRatio, 500, 0.2, 3.0, false, None);
        assert!((wide_or - 0.6).abs() < 1e-12);
        // Width > 0.5 for RD
        let wide_rd = effect_score(EffectMeasure::RiskDifference, 500, -0.3, 0.3, false, None);
        assert!((wide_rd - 0.6).abs() < 1e-12);
        // Width > 2 for SMD
        let wide_smd = effect_score(
            EffectMeasure::StandardizedMeanDifference,
            500,
            -1.2,
            1.2,
            false,
            Some(1.0),
        );
        assert!((wide_smd - 0.6).abs() < 1e-12);
    }

    #[test]
    fn unequal_variances_penalized() {
        let balanced =
            effect_score(EffectMeasure::MeanDifference, 500, 0.0, 0.2, false, Some(1.5));
        let skewed =
            effect_score(EffectMeasure::MeanDifference, 500, 0.0, 0.2, false, Some(2.5));
        assert!((balanced - 0.7).abs() < 1e-12);
        assert!((skewed - 0.6).abs() < 1e-12);
    }

    #[test]
    fn score_never_leaves_bounds() {
        let worst = effect_score(EffectMeasure::RiskDifference, 10, -5.0, 5.0, true, None);
        assert!(worst >= 0.1);
        let best = effect_score(EffectMeasure::OddsRatio, 10_000, 0.9, 1.1, false, None);
        assert!(best <= 0.9);
    }

    #[test]
    fn random_model_not_penalized_for_heterogeneity() {
        let fixed = pooled_score(10, 80.0, PoolingModel::Fixed, 0.2);
        let random = pooled_score(10, 80.0, PoolingModel::Random, 0.2);
        assert!((fixed - 0.5).abs() < 1e-12);
        assert!((random - 0.7).abs() < 1e-12);
    }

    #[test]
    fn few_studies_penalized() {
        assert!((pooled_score(2, 0.0, PoolingModel::Fixed, 0.2) - 0.5).abs() < 1e-12);
        assert!((pooled_score(4, 0.0, PoolingModel::Fixed, 0.2) - 0.6).abs() < 1e-12);
        assert!((pooled_score(6, 0.0, PoolingModel::Fixed, 0.2) - 0.7).abs() < 1e-12);
    }
}
