use super::types::ApplicantProfile;
use crate::error::ValidationError;
use crate::scoring::MAX_TENOR_MONTHS;

const MAX_AGE: u32 = 120;

/// Validate an applicant profile before it reaches the engine.
/// Returns all validation errors at once (not just the first).
///
/// Zero income and zero tenor pass: the scorers treat them as maximally
/// risky through their own sentinel branches. Tenors above
/// [`MAX_TENOR_MONTHS`] are rejected.
pub fn validate_profile(profile: &ApplicantProfile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if profile.surname.trim().is_empty() {
        errors.push(ValidationError::new("surname", "must not be empty"));
    }

    let amounts = [
        ("monthly_income", profile.monthly_income),
        ("monthly_charges", profile.monthly_charges),
        ("existing_debt", profile.existing_debt),
        ("job_tenure_years", profile.job_tenure_years),
        ("requested_amount", profile.requested_amount),
        ("down_payment", profile.down_payment),
    ];
    for (field, value) in amounts {
        if let Err(e) = check_non_negative(field, value) {
            errors.push(e);
        }
    }

    if profile.tenor_months > MAX_TENOR_MONTHS {
        errors.push(ValidationError::new(
            "tenor_months",
            format!(
                "must be at most {}, got {}",
                MAX_TENOR_MONTHS, profile.tenor_months
            ),
        ));
    }

    if profile.age > MAX_AGE {
        errors.push(ValidationError::new(
            "age",
            format!("must be at most {}, got {}", MAX_AGE, profile.age),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Finite and >= 0.
pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::new(field, "must be a finite number"))
    } else if value < 0.0 {
        Err(ValidationError::new(
            field,
            format!("must be non-negative, got {}", value),
        ))
    } else {
        Ok(())
    }
}
