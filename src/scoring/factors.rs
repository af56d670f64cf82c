use tracing::debug;

use super::config::{amount_threshold, format_amount, CURRENCY, NOMINAL_ANNUAL_RATE};
use crate::profile::{ApplicantProfile, ClientType, Profession};
use crate::simulation::monthly_installment;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A point on a [`PiecewiseLinear`] curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knot {
    pub x: f64,
    pub y: f64,
}

/// Score curve through ordered knots.
///
/// Flat at the first knot's value before it, linear between knots, and
/// extrapolated along the last segment past the final knot. Results are
/// clamped to [0, 100]. Continuous at every knot by construction.
#[derive(Debug, Clone, Copy)]
pub struct PiecewiseLinear {
    pub knots: &'static [Knot],
}

impl PiecewiseLinear {
    pub fn eval(&self, x: f64) -> f64 {
        let knots = self.knots;
        let first = knots[0];
        if x <= first.x {
            return clamp_score(first.y);
        }
        for pair in knots.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                return clamp_score(interpolate(a, b, x));
            }
        }
        let n = knots.len();
        let (a, b) = (knots[n - 2], knots[n - 1]);
        clamp_score(interpolate(a, b, x))
    }
}

fn interpolate(a: Knot, b: Knot, x: f64) -> f64 {
    a.y + (x - a.x) / (b.x - a.x) * (b.y - a.y)
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Debt ratio -> score. 100 up to 20%, then down through 70 at 33%, 40 at
/// 45%, 15 at 60% and 0 at 100%.
pub const DEBT_RATIO_CURVE: PiecewiseLinear = PiecewiseLinear {
    knots: &[
        Knot { x: 0.20, y: 100.0 },
        Knot { x: 0.33, y: 70.0 },
        Knot { x: 0.45, y: 40.0 },
        Knot { x: 0.60, y: 15.0 },
        Knot { x: 1.00, y: 0.0 },
    ],
};

/// Job tenure in years -> score, before the age adjustment.
pub const TENURE_CURVE: PiecewiseLinear = PiecewiseLinear {
    knots: &[
        Knot { x: 0.0, y: 20.0 },
        Knot { x: 1.0, y: 45.0 },
        Knot { x: 2.0, y: 65.0 },
        Knot { x: 5.0, y: 85.0 },
        Knot { x: 10.0, y: 100.0 },
    ],
};

/// Score for 0, 1, 2 and 3 incidents. Beyond that see [`payment_history_score`].
const HISTORY_STEPS: [f64; 4] = [100.0, 75.0, 50.0, 25.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebtRatioScore {
    /// 0-100, 2 decimals
    pub score: f64,
    /// Fraction, 4 decimals
    pub ratio: f64,
}

/// Score the applicant's debt ratio once the requested loan is added.
///
/// Income at or below zero returns score 0 and ratio 1.0: the applicant is
/// treated as maximally indebted.
pub fn debt_ratio_score(
    income: f64,
    charges: f64,
    existing_debt: f64,
    requested_amount: f64,
    tenor_months: u32,
) -> DebtRatioScore {
    if income <= 0.0 {
        return DebtRatioScore {
            score: 0.0,
            ratio: 1.0,
        };
    }

    let installment = monthly_installment(requested_amount, NOMINAL_ANNUAL_RATE, tenor_months);
    let ratio = (charges + existing_debt + installment) / income;

    DebtRatioScore {
        score: round_to(score_for_ratio(ratio), 2),
        ratio: round_to(ratio, 4),
    }
}

/// Unrounded curve value for a debt ratio.
pub fn score_for_ratio(ratio: f64) -> f64 {
    DEBT_RATIO_CURVE.eval(ratio)
}

/// 0 -> 100, 1 -> 75, 2 -> 50, 3 -> 25, then 10 minus 2.5 per extra
/// incident, floored at 0.
pub fn payment_history_score(incidents: u32) -> f64 {
    match HISTORY_STEPS.get(incidents as usize) {
        Some(score) => *score,
        None => (10.0 - (incidents as f64 - 4.0) * 2.5).max(0.0),
    }
}

/// Tenure curve plus an age adjustment: +5 for ages 30 to 55, -10 under 23
/// or over 65.
pub fn stability_score(tenure_years: f64, age: u32) -> f64 {
    let mut score = TENURE_CURVE.eval(tenure_years);

    if (30..=55).contains(&age) {
        score = (score + 5.0).min(100.0);
    } else if age < 23 || age > 65 {
        score = (score - 10.0).max(0.0);
    }

    round_to(clamp_score(score), 2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoherenceScore {
    pub score: f64,
    /// In evaluation order
    pub alerts: Vec<String>,
}

/// Effective amount threshold. Business clients always use the business
/// threshold.
pub fn profile_threshold(profile: &ApplicantProfile) -> f64 {
    match profile.client_type {
        ClientType::Business => amount_threshold(Profession::Business),
        ClientType::Individual => amount_threshold(profile.profession),
    }
}

/// Plausibility of the requested amount against the declared profile.
/// Deductions are independent and add up; the score floors at 0.
pub fn coherence_score(profile: &ApplicantProfile) -> CoherenceScore {
    let mut alerts = Vec::new();
    let mut score = 100.0;
    let amount = profile.requested_amount;

    let threshold = profile_threshold(profile);
    let threshold_ratio = amount / threshold;
    if threshold_ratio > 2.0 {
        score -= 60.0;
        alerts.push(format!(
            "ALERT: requested amount ({} {}) far exceeds the profile threshold for '{}' ({} {}), ratio {:.1}x",
            format_amount(amount),
            CURRENCY,
            profile.profession,
            format_amount(threshold),
            CURRENCY,
            threshold_ratio
        ));
    } else if threshold_ratio > 1.0 {
        score -= 30.0;
        alerts.push(format!(
            "WARNING: requested amount ({} {}) exceeds the recommended threshold ({} {})",
            format_amount(amount),
            CURRENCY,
            format_amount(threshold),
            CURRENCY
        ));
    }

    // Income below one unit counts as one so the ratio stays finite
    let income_ratio = amount / profile.monthly_income.max(1.0);
    if income_ratio > 60.0 {
        score -= 30.0;
        alerts.push(format!(
            "ALERT: requested amount is {:.0}x the monthly income (critical threshold: 60x)",
            income_ratio
        ));
    } else if income_ratio > 48.0 {
        score -= 15.0;
        alerts.push(format!(
            "WARNING: requested amount is {:.0}x the monthly income (warning threshold: 48x)",
            income_ratio
        ));
    }

    if profile.tenor_months > 84 {
        score -= 10.0;
        alerts.push(format!(
            "Very long tenor: {} months (over 7 years)",
            profile.tenor_months
        ));
    }

    let age_at_maturity = profile.age as f64 + profile.tenor_months as f64 / 12.0;
    if age_at_maturity > 70.0 {
        score -= 15.0;
        alerts.push(format!(
            "Applicant will be {:.0} years old at loan maturity (over 70)",
            age_at_maturity
        ));
    }

    let score = round_to(f64::max(0.0, score), 2);
    debug!(score, alerts = alerts.len(), threshold, "coherence scored");

    CoherenceScore { score, alerts }
}
