//! Narrative explanation of a score.
//!
//! Each component score is classified by how it moved the global score.
//! Classified components become [`ImportantFactor`] records, and the
//! unfavorable ones also contribute a sentence to the narrative. The output
//! is deterministic for a given input: it is stored verbatim with the
//! decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::{format_amount, CURRENCY};
use crate::profile::ApplicantProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    VeryNegative,
    Negative,
    Positive,
    VeryPositive,
}

/// Ranking order of impacts, most severe first.
pub const IMPACT_ORDER: [Impact; 4] = [
    Impact::VeryNegative,
    Impact::Negative,
    Impact::Positive,
    Impact::VeryPositive,
];

impl Impact {
    /// Position in [`IMPACT_ORDER`].
    pub fn rank(&self) -> usize {
        IMPACT_ORDER
            .iter()
            .position(|impact| impact == self)
            .unwrap_or(IMPACT_ORDER.len())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Impact::VeryNegative => "very negative",
            Impact::Negative => "negative",
            Impact::Positive => "positive",
            Impact::VeryPositive => "very positive",
        }
    }

    pub fn is_unfavorable(&self) -> bool {
        matches!(self, Impact::VeryNegative | Impact::Negative)
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImportantFactor {
    pub factor: String,
    pub impact: Impact,
    pub score: f64,
    pub detail: String,
}

/// Everything the explanation needs from one scoring run.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationInputs<'a> {
    pub profile: &'a ApplicantProfile,
    pub debt_ratio_score: f64,
    pub payment_history_score: f64,
    pub stability_score: f64,
    pub coherence_score: f64,
    pub debt_ratio: f64,
    pub global_score: f64,
    pub fraud_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub narrative: String,
    /// Most severe first
    pub factors: Vec<ImportantFactor>,
}

/// Fraud score from which the narrative carries a fraud warning.
const FRAUD_WARNING_SCORE: f64 = 50.0;

pub fn explain(inputs: &ExplanationInputs<'_>) -> Explanation {
    let profile = inputs.profile;
    let mut factors = Vec::new();
    let mut reasons = Vec::new();

    let mut record = |factor: &str, impact: Impact, score: f64, detail: String, reason: Option<String>| {
        factors.push(ImportantFactor {
            factor: factor.to_string(),
            impact,
            score,
            detail,
        });
        if let Some(reason) = reason {
            reasons.push(reason);
        }
    };

    let ratio_pct = inputs.debt_ratio * 100.0;
    let debt = inputs.debt_ratio_score;
    if debt < 40.0 {
        record(
            "Debt ratio",
            Impact::VeryNegative,
            debt,
            format!("Debt ratio of {:.1}% (critical above 45%)", ratio_pct),
            Some(format!(
                "The debt ratio is very high ({:.1}%), indicating insufficient repayment capacity",
                ratio_pct
            )),
        );
    } else if debt < 60.0 {
        record(
            "Debt ratio",
            Impact::Negative,
            debt,
            format!("Debt ratio of {:.1}% (high above 33%)", ratio_pct),
            Some(format!(
                "The debt ratio ({:.1}%) exceeds the recommended 33% threshold",
                ratio_pct
            )),
        );
    } else if debt >= 80.0 {
        record(
            "Debt ratio",
            Impact::VeryPositive,
            debt,
            format!("Debt ratio under control at {:.1}%", ratio_pct),
            None,
        );
    }

    let incidents = profile.payment_incidents_12m;
    let history = inputs.payment_history_score;
    if history < 50.0 {
        record(
            "Payment history",
            Impact::VeryNegative,
            history,
            format!("{} incidents over 12 months", incidents),
            Some(format!(
                "Payment history is concerning, with {} incidents over the last 12 months",
                incidents
            )),
        );
    } else if history < 75.0 {
        record(
            "Payment history",
            Impact::Negative,
            history,
            format!("{} incident(s) over 12 months", incidents),
            Some(format!(
                "Payment history shows {} incident(s) over the last 12 months",
                incidents
            )),
        );
    } else if history == 100.0 {
        record(
            "Payment history",
            Impact::VeryPositive,
            history,
            "No payment incidents".to_string(),
            None,
        );
    }

    let tenure = profile.job_tenure_years;
    let stability = inputs.stability_score;
    if stability < 45.0 {
        record(
            "Job stability",
            Impact::Negative,
            stability,
            format!("Job tenure of {} year(s)", tenure),
            Some(format!(
                "Job stability is weak (only {} year(s) of tenure)",
                tenure
            )),
        );
    } else if stability >= 85.0 {
        record(
            "Job stability",
            Impact::Positive,
            stability,
            format!("Solid job tenure of {} years", tenure),
            None,
        );
    }

    let coherence = inputs.coherence_score;
    if coherence < 50.0 {
        record(
            "Amount/profile coherence",
            Impact::VeryNegative,
            coherence,
            "Requested amount inconsistent with the profile".to_string(),
            Some(format!(
                "The requested amount ({} {}) is inconsistent with the '{}' profile",
                format_amount(profile.requested_amount),
                CURRENCY,
                profile.profession
            )),
        );
    }

    if inputs.fraud_score >= FRAUD_WARNING_SCORE {
        reasons.push(format!(
            "The fraud score is high ({}/100); in-depth verification is required",
            inputs.fraud_score
        ));
    }

    // sort_by_key is stable: equal impacts keep component order
    factors.sort_by_key(|factor| factor.impact.rank());

    let mut narrative = lead_sentence(inputs.global_score);
    if !reasons.is_empty() {
        narrative.push_str("\n- ");
        narrative.push_str(&reasons.join("\n- "));
    }

    Explanation { narrative, factors }
}

fn lead_sentence(global: f64) -> String {
    if global >= 65.0 {
        format!("The score of {:.1}/100 is favorable.", global)
    } else if global >= 50.0 {
        format!(
            "The score of {:.1}/100 is moderate and calls for an in-depth review.",
            global
        )
    } else if global >= 35.0 {
        format!("The score of {:.1}/100 is weak, mainly because of:", global)
    } else {
        format!(
            "The score of {:.1}/100 is critical. The major risk factors are:",
            global
        )
    }
}
