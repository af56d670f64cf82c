use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::config::{tier_for_score, Weights, NOMINAL_ANNUAL_RATE, WEIGHTS};
use super::explain::{explain, ExplanationInputs, ImportantFactor};
use super::factors::{
    coherence_score, debt_ratio_score, payment_history_score, round_to, stability_score,
};
use super::fraud::fraud_score;
use crate::error::{Error, Result};
use crate::profile::{validate_profile, ApplicantProfile};
use crate::simulation::monthly_installment;

/// Ordered risk tiers, lowest risk first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
    Critical,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::VeryLow => "Very low",
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very high",
            RiskTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision template. The first matching rule wins, fraud first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    FraudReferral,
    ConditionalApproval,
    DeepReview,
    StrictConditions,
    Refusal,
}

impl Recommendation {
    pub fn select(fraud_flag: bool, global_score: f64) -> Self {
        if fraud_flag {
            Recommendation::FraudReferral
        } else if global_score >= 65.0 {
            Recommendation::ConditionalApproval
        } else if global_score >= 50.0 {
            Recommendation::DeepReview
        } else if global_score >= 35.0 {
            Recommendation::StrictConditions
        } else {
            Recommendation::Refusal
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Recommendation::FraudReferral => {
                "IMMEDIATE REFUSAL - forward the file to the fraud unit"
            }
            Recommendation::ConditionalApproval => {
                "APPROVAL IN PRINCIPLE - eligible subject to verification"
            }
            Recommendation::DeepReview => "IN-DEPTH REVIEW - request additional guarantees",
            Recommendation::StrictConditions => {
                "HIGH RISK - approval possible under strict conditions (guarantor, pledge)"
            }
            Recommendation::Refusal => "REFUSAL RECOMMENDED - risk too high for this profile",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ComponentScores {
    pub debt_ratio: f64,
    pub payment_history: f64,
    pub stability: f64,
    pub coherence: f64,
}

impl ComponentScores {
    pub fn weighted_sum(&self, weights: &Weights) -> f64 {
        self.debt_ratio * weights.debt_ratio
            + self.payment_history * weights.payment_history
            + self.stability * weights.stability
            + self.coherence * weights.coherence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScoringDetails {
    pub weights: Weights,
    /// Whole units; 0 when the tenor is 0
    pub estimated_installment: f64,
    /// Income minus charges minus existing debt, whole units
    pub repayment_capacity: f64,
    pub nominal_annual_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringResult {
    /// 0-100, 2 decimals
    pub global_score: f64,
    pub risk_tier: RiskTier,
    pub components: ComponentScores,
    pub fraud_score: f64,
    /// Fraction, 4 decimals
    pub debt_ratio: f64,
    /// Coherence alerts, then debt ratio, then incidents, then fraud alerts
    pub alerts: Vec<String>,
    pub recommendation: Recommendation,
    pub explanation: String,
    pub fraud_flag: bool,
    pub details: ScoringDetails,
    pub important_factors: Vec<ImportantFactor>,
}

/// Prefix marking fraud alerts in the merged alert list.
pub const FRAUD_ALERT_PREFIX: &str = "[FRAUD] ";

const CRITICAL_DEBT_RATIO: f64 = 0.50;
const CONCERNING_INCIDENTS: u32 = 3;

/// Score one applicant.
///
/// Pure: the result depends only on `profile`, and repeated calls with the
/// same profile return identical results.
pub fn compute_risk_score(profile: &ApplicantProfile) -> ScoringResult {
    let debt = debt_ratio_score(
        profile.monthly_income,
        profile.monthly_charges,
        profile.existing_debt,
        profile.requested_amount,
        profile.tenor_months,
    );
    debug!(score = debt.score, ratio = debt.ratio, "debt ratio scored");

    let history = payment_history_score(profile.payment_incidents_12m);
    let stability = stability_score(profile.job_tenure_years, profile.age);
    debug!(history, stability, "history and stability scored");

    let coherence = coherence_score(profile);

    let components = ComponentScores {
        debt_ratio: debt.score,
        payment_history: history,
        stability,
        coherence: coherence.score,
    };
    let (global_score, risk_tier) = grade(components.weighted_sum(&WEIGHTS));

    let fraud = fraud_score(profile, coherence.score);

    let mut alerts = coherence.alerts;
    if debt.ratio > CRITICAL_DEBT_RATIO {
        alerts.push(format!(
            "Critical debt ratio: {:.1}% (threshold: 50%)",
            debt.ratio * 100.0
        ));
    }
    if profile.payment_incidents_12m >= CONCERNING_INCIDENTS {
        alerts.push(format!(
            "Concerning payment history: {} incidents over 12 months",
            profile.payment_incidents_12m
        ));
    }
    alerts.extend(
        fraud
            .alerts
            .iter()
            .map(|alert| format!("{}{}", FRAUD_ALERT_PREFIX, alert)),
    );

    let fraud_flag = fraud_flag(profile, fraud.score, coherence.score);

    let explanation = explain(&ExplanationInputs {
        profile,
        debt_ratio_score: debt.score,
        payment_history_score: history,
        stability_score: stability,
        coherence_score: coherence.score,
        debt_ratio: debt.ratio,
        global_score,
        fraud_score: fraud.score,
    });

    let recommendation = Recommendation::select(fraud_flag, global_score);

    let details = ScoringDetails {
        weights: WEIGHTS,
        estimated_installment: estimated_installment(profile),
        repayment_capacity: round_to(
            profile.monthly_income - profile.monthly_charges - profile.existing_debt,
            0,
        ),
        nominal_annual_rate: NOMINAL_ANNUAL_RATE,
    };

    info!(
        global_score,
        tier = %risk_tier,
        fraud_score = fraud.score,
        fraud_flag,
        alerts = alerts.len(),
        "applicant scored"
    );

    ScoringResult {
        global_score,
        risk_tier,
        components,
        fraud_score: fraud.score,
        debt_ratio: debt.ratio,
        alerts,
        recommendation,
        explanation: explanation.narrative,
        fraud_flag,
        details,
        important_factors: explanation.factors,
    }
}

/// Round the weighted sum to 2 decimals and look up its tier. The tier comes
/// from the rounded score, so a raw 79.996 reports 80 and "very low".
fn grade(weighted_sum: f64) -> (f64, RiskTier) {
    let global_score = round_to(weighted_sum, 2);
    (global_score, tier_for_score(global_score))
}

/// Validate `profile`, then score it. Every rejected field is reported.
pub fn score_checked(profile: &ApplicantProfile) -> Result<ScoringResult> {
    validate_profile(profile).map_err(Error::Validation)?;
    Ok(compute_risk_score(profile))
}

/// Any of three independent signals raises the flag: a high fraud score,
/// a major incoherence, or a request over 100 months of income.
fn fraud_flag(profile: &ApplicantProfile, fraud_score: f64, coherence: f64) -> bool {
    let high_fraud_score = fraud_score >= 50.0;
    let major_incoherence = coherence <= 20.0;
    let oversized_request = profile.monthly_income > 0.0
        && profile.requested_amount > 100.0 * profile.monthly_income;
    debug!(
        high_fraud_score,
        major_incoherence, oversized_request, "fraud signals"
    );

    high_fraud_score || major_incoherence || oversized_request
}

fn estimated_installment(profile: &ApplicantProfile) -> f64 {
    if profile.tenor_months == 0 {
        return 0.0;
    }
    round_to(
        monthly_installment(
            profile.requested_amount,
            NOMINAL_ANNUAL_RATE,
            profile.tenor_months,
        ),
        0,
    )
}
