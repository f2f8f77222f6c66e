use crate::models::{Agreement, ValidationResult};

/// |percentage error| at or below this counts as accurate.
pub const ACCURACY_TOLERANCE_PERCENT: f64 = 10.0;

/// Compare a computed ETo with an external reference for the same day and
/// place. Returns `None` when the reference is unusable (missing, zero or
/// negative), in which case validation is simply skipped.
pub fn validate_against_reference(computed_eto: f64, reference_eto: f64) -> Option<ValidationResult> {
    if !computed_eto.is_finite() || !reference_eto.is_finite() || reference_eto <= 0.0 {
        tracing::debug!(reference_eto, "Reference ETo unavailable, skipping validation");
        return None;
    }

    let difference = computed_eto - reference_eto;
    let percentage_error = difference / reference_eto * 100.0;
    let magnitude = percentage_error.abs();

    let agreement = if magnitude <= 5.0 {
        Agreement::Excellent
    } else if magnitude <= ACCURACY_TOLERANCE_PERCENT {
        Agreement::Good
    } else if magnitude <= 20.0 {
        Agreement::Fair
    } else {
        Agreement::Poor
    };

    Some(ValidationResult {
        computed_eto,
        reference_eto,
        difference,
        percentage_error,
        is_accurate: magnitude <= ACCURACY_TOLERANCE_PERCENT,
        agreement,
    })
}
