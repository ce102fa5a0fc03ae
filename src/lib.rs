//! metastat: statistical meta-analysis engine for systematic reviews.
//!
//! Pure computation over immutable numeric inputs: effect sizes for
//! binary and continuous outcomes, fixed- and random-effects pooling
//! with heterogeneity statistics, a funnel-asymmetry heuristic, and
//! network-consistency checking (loop inconsistency, node-splitting,
//! global test). No I/O, no persistence, no rendering; callers receive
//! either a fully populated result with a warnings list or an error
//! describing every validation failure in one pass.

// Export modules for library usage
pub mod bias;
pub mod core;
pub mod effect;
pub mod network;
pub mod pooling;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    errors::{Error, Result, ResultExt},
    BinaryOutcome, ContinuousOutcome, EffectEstimate, EffectMeasure, Heterogeneity, PooledResult,
    PoolingModel, StudyEffect, StudyWeight, TreatmentComparison,
};

pub use crate::effect::{
    mean_difference, odds_ratio, risk_difference, risk_ratio, standardized_mean_difference,
};

pub use crate::pooling::{pool_auto, pool_fixed, pool_random, AUTO_I_SQUARED_THRESHOLD};

pub use crate::bias::{detect_asymmetry, AsymmetryReport};

pub use crate::network::{
    check_consistency, ConsistencyReport, EvidenceLoop, GlobalInconsistencyTest,
    InconsistencySeverity, NodeSplit,
};
