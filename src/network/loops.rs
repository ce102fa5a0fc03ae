//! Loop discovery and per-loop inconsistency factors.

use std::collections::BTreeSet;

use log::debug;

use crate::core::TreatmentComparison;
use crate::network::{EvidenceLoop, GlobalInconsistencyTest, GLOBAL_ALPHA, LOOP_ALPHA};
use crate::stats::{chi_square_survival, two_tailed_p_value};

/// Sorted distinct treatment names across all comparisons.
pub(crate) fn distinct_treatments(comparisons: &[TreatmentComparison]) -> Vec<String> {
    let names: BTreeSet<&str> = comparisons
        .iter()
        .flat_map(|c| [c.treatment_a.as_str(), c.treatment_b.as_str()])
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Direction-normalized pooled direct effect between `x` and `y`.
///
/// Comparisons stored as (y, x) are negated so `effect(x,y) = −effect(y,x)`
/// always holds; multiple direct comparisons for the pair are pooled
/// inverse-variance. Returns `None` when the pair has no direct evidence.
pub(crate) fn pooled_direct(
    comparisons: &[TreatmentComparison],
    x: &str,
    y: &str,
) -> Option<(f64, f64)> {
    let mut sum_w = 0.0;
    let mut sum_we = 0.0;

    for c in comparisons {
        let effect = if c.treatment_a == x && c.treatment_b == y {
            c.effect
        } else if c.treatment_a == y && c.treatment_b == x {
            -c.effect
        } else {
            continue;
        };
        let w = 1.0 / (c.standard_error * c.standard_error);
        sum_w += w;
        sum_we += w * effect;
    }

    if sum_w > 0.0 {
        Some((sum_we / sum_w, (1.0 / sum_w).sqrt()))
    } else {
        None
    }
}

/// Enumerate every 3-treatment loop with direct evidence on all three
/// edges and compute its inconsistency factor.
pub fn find_inconsistency_loops(comparisons: &[TreatmentComparison]) -> Vec<EvidenceLoop> {
    let treatments = distinct_treatments(comparisons);
    let mut loops = Vec::new();

    // Triangle enumeration; cubic in distinct treatment count
    for i in 0..treatments.len() {
        for j in (i + 1)..treatments.len() {
            let Some(ab) = pooled_direct(comparisons, &treatments[i], &treatments[j]) else {
                continue;
            };
            for k in (j + 1)..treatments.len() {
                let Some(bc) = pooled_direct(comparisons, &treatments[j], &treatments[k]) else {
                    continue;
                };
                let Some(ac) = pooled_direct(comparisons, &treatments[i], &treatments[k]) else {
                    continue;
                };
                loops.push(evaluate_loop(
                    [
                        treatments[i].clone(),
                        treatments[j].clone(),
                        treatments[k].clone(),
                    ],
                    ab,
                    bc,
                    ac,
                ));
            }
        }
    }

    debug!(
        "triangle enumeration: {} treatments, {} closed loops",
        treatments.len(),
        loops.len()
    );
    loops
}

fn evaluate_loop(
    treatments: [String; 3],
    (e_ab, se_ab): (f64, f64),
    (e_bc, se_bc): (f64, f64),
    (e_ac, se_ac): (f64, f64),
) -> EvidenceLoop {
    let factor = (e_ab + e_bc) - e_ac;
    let se = (se_ab * se_ab + se_bc * se_bc + se_ac * se_ac).sqrt();
    let z = factor / se;
    let p = two_tailed_p_value(z);

    EvidenceLoop {
        treatments,
        inconsistency_factor: factor,
        standard_error: se,
        z_score: z,
        p_value: p,
        is_inconsistent: p < LOOP_ALPHA,
    }
}

/// Aggregate chi-square over all loop z-scores, df = loop count.
pub fn global_test(loops: &[EvidenceLoop]) -> GlobalInconsistencyTest {
    let chi_square: f64 = loops.iter().map(|l| l.z_score * l.z_score).sum();
    let df = loops.len();
    let p_value = chi_square_survival(chi_square, df);

    GlobalInconsistencyTest {
        chi_square,
        df,
        p_value,
        is_inconsistent: p_value < GLOBAL_ALPHA,
    }
}
