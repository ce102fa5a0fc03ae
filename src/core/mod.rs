//! Core value types shared across the engine.
//!
//! All types here are immutable value objects: created per call, consumed
//! within one computation, discarded. The engine keeps no state between
//! invocations, so every public operation is safe to call concurrently.

pub mod errors;

use im::Vector;
use serde::{Deserialize, Serialize};

/// Raw 2×2 table for a binary outcome.
///
/// Counts are unsigned, so negative or fractional counts cannot be
/// constructed; `events <= total` and `total > 0` per arm are enforced at
/// computation time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinaryOutcome {
    pub events_treatment: u32,
    pub total_treatment: u32,
    pub events_control: u32,
    pub total_control: u32,
}

impl BinaryOutcome {
    pub fn new(
        events_treatment: u32,
        total_treatment: u32,
        events_control: u32,
        total_control: u32,
    ) -> Self {
        Self {
            events_treatment,
            total_treatment,
            events_control,
            total_control,
        }
    }

    /// True when any of the four cells (events or non-events, either arm)
    /// is zero.
    pub fn has_zero_cell(&self) -> bool {
        self.events_treatment == 0
            || self.events_control == 0
            || self.events_treatment == self.total_treatment
            || self.events_control == self.total_control
    }

    /// Swap treatment and control arms.
    pub fn swapped(&self) -> Self {
        Self {
            events_treatment: self.events_control,
            total_treatment: self.total_control,
            events_control: self.events_treatment,
            total_control: self.total_treatment,
        }
    }
}

/// Group summary statistics for a continuous outcome.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContinuousOutcome {
    pub mean_treatment: f64,
    pub sd_treatment: f64,
    pub n_treatment: u32,
    pub mean_control: f64,
    pub sd_control: f64,
    pub n_control: u32,
}

impl ContinuousOutcome {
    pub fn new(
        mean_treatment: f64,
        sd_treatment: f64,
        n_treatment: u32,
        mean_control: f64,
        sd_control: f64,
        n_control: u32,
    ) -> Self {
        Self {
            mean_treatment,
            sd_treatment,
            n_treatment,
            mean_control,
            sd_control,
            n_control,
        }
    }

    pub fn total_n(&self) -> u32 {
        self.n_treatment + self.n_control
    }
}

/// Effect measure for a single study estimate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EffectMeasure {
    OddsRatio,
    RiskRatio,
    RiskDifference,
    MeanDifference,
    StandardizedMeanDifference,
}

impl EffectMeasure {
    /// Ratio measures are computed in log space; variance and CI symmetry
    /// are only valid there.
    pub fn is_ratio(&self) -> bool {
        matches!(self, Self::OddsRatio | Self::RiskRatio)
    }
}

impl std::fmt::Display for EffectMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OddsRatio => "OR",
            Self::RiskRatio => "RR",
            Self::RiskDifference => "RD",
            Self::MeanDifference => "MD",
            Self::StandardizedMeanDifference => "SMD",
        };
        write!(f, "{s}")
    }
}

/// A single study's effect estimate.
///
/// For ratio measures the point estimate and CI are reported on the
/// natural scale while `standard_error` and `log_effect_size` carry the
/// log-scale values used for pooling; `log_scale` is true in that case.
/// `weight` is `1/SE²` on the pooling scale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectEstimate {
    pub measure: EffectMeasure,
    pub point: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub standard_error: f64,
    pub log_effect_size: Option<f64>,
    pub weight: f64,
    pub log_scale: bool,
    pub continuity_correction_applied: bool,
    /// Advisory data-quality score in [0.1, 0.9]. A heuristic, not a
    /// calibrated statistical quantity; see [`crate::effect::confidence`].
    pub confidence: f64,
    pub warnings: Vec<String>,
}

impl EffectEstimate {
    /// The point estimate on the scale used for pooling (log scale for
    /// ratio measures, natural scale otherwise).
    pub fn pooling_point(&self) -> f64 {
        self.log_effect_size.unwrap_or(self.point)
    }

    /// Downcast to the minimal input accepted by the pooler and the
    /// network checker, carrying the pooling-scale point and SE.
    pub fn to_study_effect(&self, study_id: impl Into<String>) -> StudyEffect {
        StudyEffect {
            study_id: study_id.into(),
            effect: self.pooling_point(),
            standard_error: Some(self.standard_error),
            ci_lower: None,
            ci_upper: None,
        }
    }
}

/// Minimal per-study input for pooling.
///
/// Either `standard_error` or a `ci_lower`/`ci_upper` pair must be
/// present; the pooler derives SE from the CI when only the interval is
/// given.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StudyEffect {
    pub study_id: String,
    pub effect: f64,
    pub standard_error: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
}

impl StudyEffect {
    pub fn new(study_id: impl Into<String>, effect: f64, standard_error: f64) -> Self {
        Self {
            study_id: study_id.into(),
            effect,
            standard_error: Some(standard_error),
            ci_lower: None,
            ci_upper: None,
        }
    }

    pub fn from_interval(
        study_id: impl Into<String>,
        effect: f64,
        ci_lower: f64,
        ci_upper: f64,
    ) -> Self {
        Self {
            study_id: study_id.into(),
            effect,
            standard_error: None,
            ci_lower: Some(ci_lower),
            ci_upper: Some(ci_upper),
        }
    }
}

/// Pooling model used for a combined estimate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PoolingModel {
    Fixed,
    Random,
}

impl std::fmt::Display for PoolingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed-effect"),
            Self::Random => write!(f, "random-effects"),
        }
    }
}

/// Heterogeneity statistics for a study set.
///
/// Q tests for excess variation, I² expresses it as a percentage
/// (clamped at 0), τ² is the DerSimonian-Laird between-study variance
/// (floored at 0).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Heterogeneity {
    pub q: f64,
    pub df: usize,
    pub i_squared: f64,
    pub tau_squared: f64,
}

/// Normalized contribution of one study to a pooled estimate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StudyWeight {
    pub study_id: String,
    pub weight_percent: f64,
}

/// A pooled summary estimate across studies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PooledResult {
    pub model: PoolingModel,
    pub pooled_effect: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub standard_error: f64,
    pub z_score: f64,
    pub p_value: f64,
    /// Per-study weights normalized to sum to 100%.
    pub study_weights: Vector<StudyWeight>,
    pub heterogeneity: Heterogeneity,
    /// Set by `pool_auto`: the numeric I² that drove the model choice.
    pub model_rationale: Option<String>,
    /// Advisory score in [0.1, 0.9]; heuristic, not a statistical quantity.
    pub confidence: f64,
    pub warnings: Vec<String>,
}

/// One direct comparison between two treatments from a single study.
///
/// Direction-sensitive: reversing `treatment_a` and `treatment_b` negates
/// `effect`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreatmentComparison {
    pub study_id: String,
    pub treatment_a: String,
    pub treatment_b: String,
    pub effect: f64,
    pub standard_error: f64,
}

impl TreatmentComparison {
    pub fn new(
        study_id: impl Into<String>,
        treatment_a: impl Into<String>,
        treatment_b: impl Into<String>,
        effect: f64,
        standard_error: f64,
    ) -> Self {
        Self {
            study_id: study_id.into(),
            treatment_a: treatment_a.into(),
            treatment_b: treatment_b.into(),
            effect,
            standard_error,
        }
    }
}
