//! Input validation for raw outcome data.
//!
//! Every check runs and every violation is collected before an error is
//! raised, so the caller sees the complete list in one pass. Numeric
//! degeneracies are rejected here so the pooler and network checker can
//! assume finite, positive standard errors.

use crate::core::errors::{Error, Result};
use crate::core::{BinaryOutcome, ContinuousOutcome};

pub(crate) fn validate_binary(outcome: &BinaryOutcome) -> Result<()> {
    let mut violations = Vec::new();

    if outcome.total_treatment == 0 {
        violations.push("total_treatment must be positive".to_string());
    }
    if outcome.total_control == 0 {
        violations.push("total_control must be positive".to_string());
    }
    if outcome.events_treatment > outcome.total_treatment {
        violations.push(format!(
            "events_treatment ({}) exceeds total_treatment ({})",
            outcome.events_treatment, outcome.total_treatment
        ));
    }
    if outcome.events_control > outcome.total_control {
        violations.push(format!(
            "events_control ({}) exceeds total_control ({})",
            outcome.events_control, outcome.total_control
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::invalid_data(violations))
    }
}

pub(crate) fn validate_continuous(outcome: &ContinuousOutcome) -> Result<()> {
    let mut violations = Vec::new();

    if !outcome.mean_treatment.is_finite() {
        violations.push("mean_treatment must be finite".to_string());
    }
    if !outcome.mean_control.is_finite() {
        violations.push("mean_control must be finite".to_string());
    }
    if !(outcome.sd_treatment.is_finite() && outcome.sd_treatment > 0.0) {
        violations.push(format!(
            "sd_treatment must be finite and positive (got {})",
            outcome.sd_treatment
        ));
    }
    if !(outcome.sd_control.is_finite() && outcome.sd_control > 0.0) {
        violations.push(format!(
            "sd_control must be finite and positive (got {})",
            outcome.sd_control
        ));
    }
    if outcome.n_treatment == 0 {
        violations.push("n_treatment must be positive".to_string());
    }
    if outcome.n_control == 0 {
        violations.push("n_control must be positive".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::invalid_data(violations))
    }
}

/// SMD needs at least one pooled degree of freedom for the pooled SD and
/// the Hedges correction factor.
pub(crate) fn validate_smd_degrees_of_freedom(outcome: &ContinuousOutcome) -> Result<()> {
    if outcome.n_treatment + outcome.n_control > 2 {
        Ok(())
    } else {
        Err(Error::invalid_data(vec![
            "standardized mean difference requires more than 2 participants across arms"
                .to_string(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_collects_every_violation() {
        let outcome = BinaryOutcome::new(5, 0, 7, 3);
        let err = validate_binary(&outcome).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.contains("total_treatment")));
        assert!(violations
            .iter()
            .any(|v| v.contains("events_treatment (5) exceeds")));
        assert!(violations
            .iter()
            .any(|v| v.contains("events_control (7) exceeds")));
    }

    #[test]
    fn binary_accepts_well_formed_table() {
        assert!(validate_binary(&BinaryOutcome::new(15, 100, 30, 100)).is_ok());
        assert!(validate_binary(&BinaryOutcome::new(0, 10, 10, 10)).is_ok());
    }

    #[test]
    fn continuous_rejects_zero_sd_and_nan_mean() {
        let outcome = ContinuousOutcome::new(f64::NAN, 0.0, 10, 5.0, 2.0, 0);
        let err = validate_continuous(&outcome).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.contains("mean_treatment")));
        assert!(violations.iter().any(|v| v.contains("sd_treatment")));
        assert!(violations.iter().any(|v| v.contains("n_control")));
    }

    #[test]
    fn smd_requires_pooled_degrees_of_freedom() {
        let outcome = ContinuousOutcome::new(1.0, 1.0, 1, 0.0, 1.0, 1);
        assert!(validate_smd_degrees_of_freedom(&outcome).is_err());
        let outcome = ContinuousOutcome::new(1.0, 1.0, 2, 0.0, 1.0, 1);
        assert!(validate_smd_degrees_of_freedom(&outcome).is_ok());
    }
}
