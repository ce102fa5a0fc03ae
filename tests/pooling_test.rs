use metastat::*;
use pretty_assertions::assert_eq;

fn heterogeneous_pair() -> Vec<StudyEffect> {
    vec![
        StudyEffect::new("trial-1", 0.5, 0.1),
        StudyEffect::new("trial-2", 0.2, 0.15),
    ]
}

#[test]
fn two_study_fixed_pool_reference_values() {
    let result = pool_fixed(&heterogeneous_pair()).unwrap();

    // w1 = 100, w2 = 44.44: pooled = (50 + 8.889) / 144.44
    assert!((result.pooled_effect - 0.40769).abs() < 1e-4);
    assert_eq!(result.model, PoolingModel::Fixed);
    assert_eq!(result.heterogeneity.df, 1);
    assert!((result.heterogeneity.q - 2.769).abs() < 1e-2);
    assert!(result.heterogeneity.i_squared > 50.0);
}

#[test]
fn auto_selection_uses_i_squared() {
    // The pair is heterogeneous (I² ≈ 64%): auto must pick random
    let auto = pool_auto(&heterogeneous_pair()).unwrap();
    assert_eq!(auto.model, PoolingModel::Random);
    assert!(auto
        .model_rationale
        .as_deref()
        .unwrap()
        .contains("exceeds the 50% threshold"));

    // A homogeneous set stays fixed
    let homogeneous = vec![
        StudyEffect::new("a", 0.30, 0.08),
        StudyEffect::new("b", 0.32, 0.09),
        StudyEffect::new("c", 0.28, 0.10),
        StudyEffect::new("d", 0.31, 0.07),
    ];
    let auto = pool_auto(&homogeneous).unwrap();
    assert_eq!(auto.model, PoolingModel::Fixed);
}

#[test]
fn dersimonian_laird_floor() {
    let homogeneous = vec![
        StudyEffect::new("a", 0.30, 0.08),
        StudyEffect::new("b", 0.32, 0.09),
        StudyEffect::new("c", 0.28, 0.10),
    ];
    let fixed = pool_fixed(&homogeneous).unwrap();
    let random = pool_random(&homogeneous).unwrap();

    assert!(fixed.heterogeneity.q <= fixed.heterogeneity.df as f64);
    assert_eq!(random.heterogeneity.tau_squared, 0.0);
    assert!((fixed.pooled_effect - random.pooled_effect).abs() < 1e-12);
    assert!((fixed.ci_lower - random.ci_lower).abs() < 1e-12);
    assert!((fixed.ci_upper - random.ci_upper).abs() < 1e-12);
}

#[test]
fn outlier_strictly_increases_heterogeneity() {
    let homogeneous = vec![
        StudyEffect::new("a", 0.40, 0.08),
        StudyEffect::new("b", 0.40, 0.12),
        StudyEffect::new("c", 0.40, 0.10),
        StudyEffect::new("d", 0.40, 0.15),
    ];
    let with_outlier = {
        let mut set = homogeneous.clone();
        set.push(StudyEffect::new("outlier", 1.60, 0.10));
        set
    };

    let base = pool_fixed(&homogeneous).unwrap().heterogeneity;
    let bumped = pool_fixed(&with_outlier).unwrap().heterogeneity;

    assert!(base.q < 1e-20);
    assert!(bumped.q > base.q);
    assert!(bumped.i_squared > base.i_squared);
}

#[test]
fn heterogeneity_is_model_invariant() {
    let studies = heterogeneous_pair();
    let fixed = pool_fixed(&studies).unwrap();
    let random = pool_random(&studies).unwrap();
    assert_eq!(fixed.heterogeneity, random.heterogeneity);
}

#[test]
fn weights_normalized_and_ordered_by_precision() {
    let studies = vec![
        StudyEffect::new("precise", 0.4, 0.05),
        StudyEffect::new("vague", 0.4, 0.25),
    ];
    let result = pool_fixed(&studies).unwrap();
    let total: f64 = result.study_weights.iter().map(|w| w.weight_percent).sum();
    assert!((total - 100.0).abs() < 1e-9);

    let precise = &result.study_weights[0];
    let vague = &result.study_weights[1];
    assert_eq!(precise.study_id, "precise");
    assert!(precise.weight_percent > vague.weight_percent);
}

#[test]
fn random_weights_are_more_even_under_heterogeneity() {
    let studies = heterogeneous_pair();
    let fixed = pool_fixed(&studies).unwrap();
    let random = pool_random(&studies).unwrap();

    let spread = |r: &PooledResult| {
        r.study_weights[0].weight_percent - r.study_weights[1].weight_percent
    };
    assert!(spread(&random) < spread(&fixed));
}

#[test]
fn pooled_result_serializes_for_downstream_reporting() {
    let result = pool_auto(&heterogeneous_pair()).unwrap();
    let json = serde_json::to_string_pretty(&result).unwrap();
    let back: PooledResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.model, result.model);
    assert_eq!(back.study_weights.len(), 2);
}

#[test]
fn empty_and_malformed_inputs_fail_loudly() {
    assert!(matches!(
        pool_auto(&[]).unwrap_err(),
        Error::InsufficientData(_)
    ));

    let bad = vec![StudyEffect::from_interval("upside-down", 0.4, 1.0, 0.0)];
    let err = pool_auto(&bad).unwrap_err();
    assert!(err.violations().unwrap()[0].contains("ci_lower"));
}
