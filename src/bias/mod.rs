//! Funnel-plot asymmetry heuristic (no rendering).
//!
//! Partitions studies around the pooled estimate and flags asymmetry only
//! when the split is both strongly lopsided (ratio > 2) and large in
//! absolute terms (difference ≥ 3). Requiring both avoids false positives
//! on small study sets. This is a coarse visual-symmetry rule of thumb,
//! not a formal test; the interpretation text says so explicitly.

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::StudyEffect;

/// Side-count ratio above which the partition counts as lopsided.
pub const ASYMMETRY_RATIO_THRESHOLD: f64 = 2.0;
/// Minimum absolute side-count difference to flag.
pub const ASYMMETRY_MIN_DIFFERENCE: usize = 3;

/// Result of the asymmetry check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AsymmetryReport {
    pub asymmetry_detected: bool,
    pub studies_below: usize,
    pub studies_at_or_above: usize,
    pub interpretation: String,
}

/// Partition `studies` by effect relative to `pooled_effect` and apply
/// the ratio-and-difference rule.
pub fn detect_asymmetry(studies: &[StudyEffect], pooled_effect: f64) -> Result<AsymmetryReport> {
    if studies.is_empty() {
        return Err(Error::insufficient_data(
            "at least one study is required for the asymmetry check",
        ));
    }

    let studies_below = studies.iter().filter(|s| s.effect < pooled_effect).count();
    let studies_at_or_above = studies.len() - studies_below;

    let smaller = studies_below.min(studies_at_or_above);
    let larger = studies_below.max(studies_at_or_above);
    let lopsided = if smaller == 0 {
        larger > 0
    } else {
        larger as f64 / smaller as f64 > ASYMMETRY_RATIO_THRESHOLD
    };
    let asymmetry_detected = lopsided && larger - smaller >= ASYMMETRY_MIN_DIFFERENCE;

    let interpretation = if asymmetry_detected {
        format!(
            "Funnel asymmetry detected ({studies_below} studies below vs {studies_at_or_above} at or above the pooled estimate). \
             This is a coarse visual-symmetry heuristic and not a substitute for formal tests \
             such as Egger's regression or Begg's rank correlation."
        )
    } else {
        format!(
            "No funnel asymmetry detected ({studies_below} studies below vs {studies_at_or_above} at or above the pooled estimate). \
             This is a coarse visual-symmetry heuristic and not a substitute for formal tests \
             such as Egger's regression or Begg's rank correlation."
        )
    };

    Ok(AsymmetryReport {
        asymmetry_detected,
        studies_below,
        studies_at_or_above,
        interpretation,
    })
}
