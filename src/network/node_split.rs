//! Node-splitting: direct vs indirect evidence per treatment pair.
//!
//! The indirect estimate for a pair (a, b) is built from every two-step
//! path a–c–b through a common comparator: each path contributes
//! `effect(a,c) + effect(c,b)` with variance equal to the sum of the two
//! edge variances, and paths are pooled inverse-variance. Shared edges
//! between paths are treated as independent and longer paths are not
//! traversed, so the indirect SE is an approximation; the original
//! fixed-multiplier placeholder this replaces had no network grounding
//! at all.

use crate::core::TreatmentComparison;
use crate::network::loops::{distinct_treatments, pooled_direct};
use crate::network::{NodeSplit, LOOP_ALPHA};
use crate::stats::two_tailed_p_value;

/// Split every unordered treatment pair with direct evidence.
pub fn split_all(comparisons: &[TreatmentComparison]) -> Vec<NodeSplit> {
    let treatments = distinct_treatments(comparisons);
    let mut splits = Vec::new();

    for i in 0..treatments.len() {
        for j in (i + 1)..treatments.len() {
            let a = &treatments[i];
            let b = &treatments[j];
            let Some((direct_effect, direct_se)) = pooled_direct(comparisons, a, b) else {
                continue;
            };
            splits.push(split_pair(
                comparisons,
                &treatments,
                a,
                b,
                direct_effect,
                direct_se,
            ));
        }
    }

    splits
}

fn split_pair(
    comparisons: &[TreatmentComparison],
    treatments: &[String],
    a: &str,
    b: &str,
    direct_effect: f64,
    direct_se: f64,
) -> NodeSplit {
    let indirect = indirect_estimate(comparisons, treatments, a, b);

    let (indirect_effect, indirect_se, difference, p_value, is_inconsistent) = match indirect {
        Some((effect, se)) => {
            let difference = direct_effect - effect;
            let se_diff = (direct_se * direct_se + se * se).sqrt();
            let p = two_tailed_p_value(difference / se_diff);
            (Some(effect), Some(se), Some(difference), Some(p), p < LOOP_ALPHA)
        }
        None => (None, None, None, None, false),
    };

    NodeSplit {
        treatment_a: a.to_string(),
        treatment_b: b.to_string(),
        direct_effect,
        direct_se,
        indirect_effect,
        indirect_se,
        difference,
        p_value,
        is_inconsistent,
    }
}

/// Inverse-variance pool of all two-step path estimates for (a, b).
fn indirect_estimate(
    comparisons: &[TreatmentComparison],
    treatments: &[String],
    a: &str,
    b: &str,
) -> Option<(f64, f64)> {
    let mut sum_w = 0.0;
    let mut sum_we = 0.0;

    for c in treatments {
        if c == a || c == b {
            continue;
        }
        let Some((e_ac, se_ac)) = pooled_direct(comparisons, a, c) else {
            continue;
        };
        let Some((e_cb, se_cb)) = pooled_direct(comparisons, c, b) else {
            continue;
        };
        let path_effect = e_ac + e_cb;
        let path_var = se_ac * se_ac + se_cb * se_cb;
        let w = 1.0 / path_var;
        sum_w += w;
        sum_we += w * path_effect;
    }

    if sum_w > 0.0 {
        Some((sum_we / sum_w, (1.0 / sum_w).sqrt()))
    } else {
        None
    }
}
