//! Network-consistency checking over treatment comparisons.
//!
//! Direct and indirect evidence in a treatment network must agree; this
//! module detects where they do not. The pipeline enumerates closed
//! 3-treatment loops, computes a per-loop inconsistency factor, splits
//! each directly compared pair into direct vs indirect evidence, and
//! aggregates a global chi-square test. Triangle enumeration is cubic in
//! the number of distinct treatments, which is acceptable for typical
//! networks of tens of treatments but worth noting beyond ~100.

pub mod loops;
pub mod node_split;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::TreatmentComparison;

/// Per-loop and per-split significance threshold. Deliberately looser
/// than 0.05: the per-loop test has low power.
pub const LOOP_ALPHA: f64 = 0.10;
/// Global chi-square significance threshold.
pub const GLOBAL_ALPHA: f64 = 0.05;

/// A closed 3-treatment evidence loop with its inconsistency factor
/// `(effect(a,b) + effect(b,c)) − effect(a,c)`, expected 0 under
/// consistency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvidenceLoop {
    pub treatments: [String; 3],
    pub inconsistency_factor: f64,
    pub standard_error: f64,
    pub z_score: f64,
    pub p_value: f64,
    pub is_inconsistent: bool,
}

/// Direct vs indirect evidence for one treatment pair.
///
/// The indirect estimate is derived from two-step paths through common
/// comparators, pooled inverse-variance. Paths longer than two edges are
/// not traversed and shared edges between paths are treated as
/// independent, so the indirect SE is approximate. Pairs with no two-step
/// path carry `None` for the indirect fields and are never flagged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSplit {
    pub treatment_a: String,
    pub treatment_b: String,
    pub direct_effect: f64,
    pub direct_se: f64,
    pub indirect_effect: Option<f64>,
    pub indirect_se: Option<f64>,
    pub difference: Option<f64>,
    pub p_value: Option<f64>,
    pub is_inconsistent: bool,
}

/// Aggregate chi-square test over all loop z-scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalInconsistencyTest {
    pub chi_square: f64,
    pub df: usize,
    pub p_value: f64,
    pub is_inconsistent: bool,
}

/// Network-level severity from the proportion of inconsistent loops.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum InconsistencySeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl std::fmt::Display for InconsistencySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        };
        write!(f, "{s}")
    }
}

/// Full consistency report for a treatment network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub loops: Vec<EvidenceLoop>,
    pub node_splits: Vec<NodeSplit>,
    pub global_test: Option<GlobalInconsistencyTest>,
    pub severity: InconsistencySeverity,
    pub warnings: Vec<String>,
}

/// Run the full consistency pipeline.
///
/// A network without closed loops yields an empty loop list plus a
/// warning — inconsistency is then unassessable, not assumed absent.
pub fn check_consistency(comparisons: &[TreatmentComparison]) -> Result<ConsistencyReport> {
    if comparisons.is_empty() {
        return Err(Error::insufficient_data(
            "at least one treatment comparison is required",
        ));
    }

    let loops = loops::find_inconsistency_loops(comparisons);
    let node_splits = node_split::split_all(comparisons);

    let mut warnings = Vec::new();
    let global_test = if loops.is_empty() {
        warnings.push(
            "no closed treatment loops in the network; loop inconsistency is unassessable"
                .to_string(),
        );
        None
    } else {
        Some(loops::global_test(&loops))
    };

    Ok(ConsistencyReport {
        severity: classify_severity(&loops),
        loops,
        node_splits,
        global_test,
        warnings,
    })
}

fn classify_severity(loops: &[EvidenceLoop]) -> InconsistencySeverity {
    let inconsistent = loops.iter().filter(|l| l.is_inconsistent).count();
    if inconsistent == 0 {
        return InconsistencySeverity::None;
    }
    let proportion = inconsistent as f64 / loops.len() as f64;
    if proportion <= 0.25 {
        InconsistencySeverity::Mild
    } else if proportion <= 0.50 {
        InconsistencySeverity::Moderate
    } else {
        InconsistencySeverity::Severe
    }
}
