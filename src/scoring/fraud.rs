use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{format_amount, income_sanity_threshold, CURRENCY};
use super::factors::round_to;
use crate::profile::ApplicantProfile;

/// Declared income above this with no declared charges is suspicious.
const SIGNIFICANT_INCOME: f64 = 300_000.0;
/// Incident count from which a large request is suspicious.
const INCIDENTS_FOR_LARGE_REQUEST: u32 = 3;
const LARGE_REQUEST: f64 = 10_000_000.0;

/// Fraud score (0 = no signal, 100 = certain) with its own alerts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FraudAssessment {
    pub score: f64,
    pub alerts: Vec<String>,
}

/// Additive fraud rules over the profile and its coherence score. The total
/// is capped at 100. Some rules add points without an alert.
pub fn fraud_score(profile: &ApplicantProfile, coherence: f64) -> FraudAssessment {
    let mut score = 0.0;
    let mut alerts = Vec::new();
    let income = profile.monthly_income;
    let amount = profile.requested_amount;

    if coherence <= 20.0 {
        score += 40.0;
        alerts.push("Major incoherence between requested amount and applicant profile".to_string());
    } else if coherence <= 50.0 {
        score += 20.0;
    }

    if income > 0.0 {
        let ratio = amount / income;
        if ratio > 100.0 {
            score += 30.0;
            alerts.push(format!("Requested amount is {:.0}x the monthly income", ratio));
        } else if ratio > 60.0 {
            score += 15.0;
        }
    }

    if let Some(threshold) = income_sanity_threshold(profile.profession) {
        if income > threshold * 3.0 {
            score += 15.0;
            alerts.push(format!(
                "Declared income ({} {}) is abnormally high for profile '{}'",
                format_amount(income),
                CURRENCY,
                profile.profession
            ));
        }
    }

    if income > SIGNIFICANT_INCOME && profile.monthly_charges == 0.0 {
        score += 10.0;
        alerts.push("No charges declared despite significant income".to_string());
    }

    if profile.payment_incidents_12m >= INCIDENTS_FOR_LARGE_REQUEST && amount > LARGE_REQUEST {
        score += 15.0;
        alerts.push(format!(
            "Applicant with {} incidents requesting {} {}",
            profile.payment_incidents_12m,
            format_amount(amount),
            CURRENCY
        ));
    }

    let score = round_to(f64::min(100.0, score), 2);
    debug!(score, alerts = alerts.len(), "fraud scored");

    FraudAssessment { score, alerts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ClientType, Profession};

    fn sample_profile() -> ApplicantProfile {
        ApplicantProfile {
            surname: "Diallo".to_string(),
            first_name: "Awa".to_string(),
            national_id: None,
            client_type: ClientType::Individual,
            profession: Profession::ExperiencedEmployee,
            monthly_income: 450_000.0,
            monthly_charges: 80_000.0,
            existing_debt: 30_000.0,
            job_tenure_years: 4.0,
            payment_incidents_12m: 0,
            requested_amount: 5_000_000.0,
            tenor_months: 36,
            age: 30,
            down_payment: 0.0,
        }
    }

    #[test]
    fn test_clean_profile_scores_zero() {
        let result = fraud_score(&sample_profile(), 100.0);
        assert_eq!(result.score, 0.0);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_coherence_rules() {
        let profile = sample_profile();

        let result = fraud_score(&profile, 20.0);
        assert_eq!(result.score, 40.0);
        assert_eq!(
            result.alerts,
            vec!["Major incoherence between requested amount and applicant profile"]
        );

        // Mid band adds points silently
        let result = fraud_score(&profile, 50.0);
        assert_eq!(result.score, 20.0);
        assert!(result.alerts.is_empty());

        let result = fraud_score(&profile, 50.01);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_income_multiple_rules() {
        let mut profile = sample_profile();
        profile.requested_amount = 450_000.0 * 150.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 30.0);
        assert_eq!(result.alerts, vec!["Requested amount is 150x the monthly income"]);

        profile.requested_amount = 450_000.0 * 80.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 15.0);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_zero_income_skips_income_multiple() {
        let mut profile = sample_profile();
        profile.monthly_income = 0.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_income_sanity_only_for_listed_professions() {
        let mut profile = sample_profile();
        profile.profession = Profession::Student;
        profile.monthly_income = 700_000.0; // > 3 x 200k
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 15.0);
        assert!(result.alerts[0].contains("(700,000 FCFA) is abnormally high for profile 'student'"));

        profile.profession = Profession::SeniorEmployee;
        profile.monthly_income = 50_000_000.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_missing_charges_with_significant_income() {
        let mut profile = sample_profile();
        profile.monthly_charges = 0.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 10.0);
        assert_eq!(result.alerts, vec!["No charges declared despite significant income"]);

        profile.monthly_income = 300_000.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_incidents_with_large_request() {
        let mut profile = sample_profile();
        profile.monthly_income = 5_000_000.0;
        profile.payment_incidents_12m = 3;
        profile.requested_amount = 12_000_000.0;
        let result = fraud_score(&profile, 100.0);
        assert_eq!(result.score, 15.0);
        assert_eq!(
            result.alerts,
            vec!["Applicant with 3 incidents requesting 12,000,000 FCFA"]
        );
    }

    #[test]
    fn test_score_caps_at_100() {
        let mut profile = sample_profile();
        profile.profession = Profession::Student;
        profile.monthly_income = 800_000.0; // 4x the student threshold
        profile.monthly_charges = 0.0;
        profile.payment_incidents_12m = 5;
        profile.requested_amount = 120_000_000.0; // 150x income
        // 40 + 30 + 15 + 10 + 15 = 110
        let result = fraud_score(&profile, 10.0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.alerts.len(), 5);
    }
}
