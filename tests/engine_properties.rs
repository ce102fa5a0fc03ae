//! Property-based tests for the engine's structural invariants:
//! - Arm-swap symmetry of binary effect measures
//! - Continuity correction triggers exactly when a cell is zero
//! - Singleton pooling is idempotent
//! - CI brackets the point estimate on the natural scale
//! - Loop inconsistency is invariant under comparison direction

use metastat::*;
use proptest::prelude::*;

/// A 2×2 table with no zero cells (events strictly between 0 and total).
fn interior_binary_outcome() -> impl Strategy<Value = BinaryOutcome> {
    (2u32..500, 2u32..500).prop_flat_map(|(total_t, total_c)| {
        (1u32..total_t, 1u32..total_c)
            .prop_map(move |(e_t, e_c)| BinaryOutcome::new(e_t, total_t, e_c, total_c))
    })
}

/// Any valid 2×2 table, zero cells allowed.
fn any_binary_outcome() -> impl Strategy<Value = BinaryOutcome> {
    (1u32..500, 1u32..500).prop_flat_map(|(total_t, total_c)| {
        (0u32..=total_t, 0u32..=total_c)
            .prop_map(move |(e_t, e_c)| BinaryOutcome::new(e_t, total_t, e_c, total_c))
    })
}

proptest! {
    #[test]
    fn or_and_rr_invert_under_arm_swap(outcome in interior_binary_outcome()) {
        let or = odds_ratio(&outcome).unwrap();
        let or_swapped = odds_ratio(&outcome.swapped()).unwrap();
        prop_assert!((or.point * or_swapped.point - 1.0).abs() < 1e-6);

        let rr = risk_ratio(&outcome).unwrap();
        let rr_swapped = risk_ratio(&outcome.swapped()).unwrap();
        prop_assert!((rr.point * rr_swapped.point - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rd_negates_under_arm_swap(outcome in interior_binary_outcome()) {
        let rd = risk_difference(&outcome).unwrap();
        let rd_swapped = risk_difference(&outcome.swapped()).unwrap();
        prop_assert!((rd.point + rd_swapped.point).abs() < 1e-9);
        prop_assert!((rd.standard_error - rd_swapped.standard_error).abs() < 1e-9);
    }

    #[test]
    fn continuity_correction_iff_zero_cell(outcome in any_binary_outcome()) {
        let estimate = odds_ratio(&outcome).unwrap();
        prop_assert_eq!(
            estimate.continuity_correction_applied,
            outcome.has_zero_cell()
        );
        prop_assert_eq!(estimate.warnings.is_empty(), !outcome.has_zero_cell());
    }

    #[test]
    fn ci_always_brackets_point(outcome in any_binary_outcome()) {
        let estimate = odds_ratio(&outcome).unwrap();
        prop_assert!(estimate.ci_lower <= estimate.point);
        prop_assert!(estimate.point <= estimate.ci_upper);
        prop_assert!(estimate.confidence >= 0.1 && estimate.confidence <= 0.9);
    }

    #[test]
    fn singleton_pool_is_idempotent(
        effect in -3.0f64..3.0,
        se in 0.01f64..2.0,
    ) {
        let study = StudyEffect::new("solo", effect, se);
        let result = pool_fixed(std::slice::from_ref(&study)).unwrap();
        prop_assert!((result.pooled_effect - effect).abs() < 1e-9);
        prop_assert!((result.standard_error - se).abs() < 1e-9);
        prop_assert_eq!(result.heterogeneity.df, 0);
    }

    #[test]
    fn pooled_estimate_stays_within_study_range(
        effects in prop::collection::vec(-2.0f64..2.0, 2..8),
    ) {
        let studies: Vec<StudyEffect> = effects
            .iter()
            .enumerate()
            .map(|(i, &e)| StudyEffect::new(format!("s{i}"), e, 0.1 + 0.05 * i as f64))
            .collect();

        for result in [
            pool_fixed(&studies).unwrap(),
            pool_random(&studies).unwrap(),
        ] {
            let min = effects.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = effects.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(result.pooled_effect >= min - 1e-9);
            prop_assert!(result.pooled_effect <= max + 1e-9);
        }
    }

    #[test]
    fn loop_factor_is_direction_invariant(
        e_ab in -1.0f64..1.0,
        e_bc in -1.0f64..1.0,
        e_ac in -1.0f64..1.0,
    ) {
        let forward = vec![
            TreatmentComparison::new("s1", "A", "B", e_ab, 0.1),
            TreatmentComparison::new("s2", "B", "C", e_bc, 0.1),
            TreatmentComparison::new("s3", "A", "C", e_ac, 0.1),
        ];
        let reversed = vec![
            TreatmentComparison::new("s1", "B", "A", -e_ab, 0.1),
            TreatmentComparison::new("s2", "C", "B", -e_bc, 0.1),
            TreatmentComparison::new("s3", "C", "A", -e_ac, 0.1),
        ];
        let f = check_consistency(&forward).unwrap();
        let r = check_consistency(&reversed).unwrap();
        prop_assert_eq!(f.loops.len(), 1);
        prop_assert!(
            (f.loops[0].inconsistency_factor - r.loops[0].inconsistency_factor).abs() < 1e-9
        );
    }
}
