use serde::{Deserialize, Serialize};

use super::engine::RiskTier;
use crate::profile::Profession;

/// Nominal annual rate used to estimate the installment of a requested loan.
pub const NOMINAL_ANNUAL_RATE: f64 = 0.15;

/// Currency label used in alerts and reports.
pub const CURRENCY: &str = "FCFA";

/// Longest accepted loan, in months. Installments stay finite up to here.
pub const MAX_TENOR_MONTHS: u32 = 600;

/// Format a money amount as whole units with thousands separators
/// (1234567.8 -> "1,234,568")
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Component weights of the global score. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Weights {
    pub debt_ratio: f64,
    pub payment_history: f64,
    pub stability: f64,
    pub coherence: f64,
}

pub const WEIGHTS: Weights = Weights {
    debt_ratio: 0.35,
    payment_history: 0.30,
    stability: 0.20,
    coherence: 0.15,
};

/// One row of the tier table. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBand {
    pub tier: RiskTier,
    pub min: f64,
    pub max: f64,
}

impl RiskBand {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}

/// Tier table, scanned top to bottom; first match wins. Adjacent bands share
/// their boundary, so a score sitting exactly on one (80, 65, 50, 35, 20)
/// lands in the higher band.
pub const RISK_BANDS: [RiskBand; 6] = [
    RiskBand { tier: RiskTier::VeryLow, min: 80.0, max: 100.0 },
    RiskBand { tier: RiskTier::Low, min: 65.0, max: 80.0 },
    RiskBand { tier: RiskTier::Moderate, min: 50.0, max: 65.0 },
    RiskBand { tier: RiskTier::High, min: 35.0, max: 50.0 },
    RiskBand { tier: RiskTier::VeryHigh, min: 20.0, max: 35.0 },
    RiskBand { tier: RiskTier::Critical, min: 0.0, max: 20.0 },
];

/// Look up the tier for a global score. Anything outside every band is
/// critical.
pub fn tier_for_score(score: f64) -> RiskTier {
    RISK_BANDS
        .iter()
        .find(|band| band.contains(score))
        .map(|band| band.tier)
        .unwrap_or(RiskTier::Critical)
}

/// Maximum reasonable loan amount per profession.
pub const PROFILE_AMOUNT_THRESHOLDS: [(Profession, f64); 7] = [
    (Profession::Student, 500_000.0),
    (Profession::JuniorEmployee, 5_000_000.0),
    (Profession::ExperiencedEmployee, 20_000_000.0),
    (Profession::SeniorEmployee, 50_000_000.0),
    (Profession::Entrepreneur, 30_000_000.0),
    (Profession::Retired, 10_000_000.0),
    (Profession::Business, 200_000_000.0),
];

/// Used for any profession missing from [`PROFILE_AMOUNT_THRESHOLDS`].
pub const DEFAULT_AMOUNT_THRESHOLD: f64 = 10_000_000.0;

pub fn amount_threshold(profession: Profession) -> f64 {
    PROFILE_AMOUNT_THRESHOLDS
        .iter()
        .find(|(p, _)| *p == profession)
        .map(|(_, threshold)| *threshold)
        .unwrap_or(DEFAULT_AMOUNT_THRESHOLD)
}

/// Plausible monthly income per profession. Only these professions get the
/// declared-income sanity check; the keyset differs from the amount table
/// on purpose.
pub const INCOME_SANITY_THRESHOLDS: [(Profession, f64); 4] = [
    (Profession::Student, 200_000.0),
    (Profession::JuniorEmployee, 500_000.0),
    (Profession::ExperiencedEmployee, 2_000_000.0),
    (Profession::Retired, 1_000_000.0),
];

pub fn income_sanity_threshold(profession: Profession) -> Option<f64> {
    INCOME_SANITY_THRESHOLDS
        .iter()
        .find(|(p, _)| *p == profession)
        .map(|(_, threshold)| *threshold)
}
