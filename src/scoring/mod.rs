pub mod config;
pub mod engine;
pub mod explain;
pub mod factors;
pub mod fraud;

pub use config::*;
pub use engine::{
    compute_risk_score, score_checked, ComponentScores, Recommendation, RiskTier, ScoringDetails, ScoringResult,
    FRAUD_ALERT_PREFIX,
};
pub use explain::{explain, Explanation, ExplanationInputs, Impact, ImportantFactor};
pub use factors::{
    coherence_score, debt_ratio_score, payment_history_score, round_to, score_for_ratio,
    stability_score, CoherenceScore, DebtRatioScore, PiecewiseLinear,
};
pub use fraud::{fraud_score, FraudAssessment};
