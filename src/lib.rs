//! Loan risk scoring engine.
//!
//! Given an applicant profile and a requested loan, produces a weighted risk
//! score, a separate fraud score, a risk tier, a ranked list of important
//! factors with a narrative explanation, and a recommendation. A standalone
//! loan simulator shares the installment math.
//!
//! Every entry point is a pure function of its inputs.

pub mod error;
pub mod input;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod simulation;
pub mod telemetry;

pub use error::{Error, Result, ValidationError};
pub use profile::{validate_profile, ApplicantProfile, ClientType, Profession};
pub use scoring::{compute_risk_score, score_checked, Recommendation, RiskTier, ScoringResult};
pub use simulation::{
    monthly_installment, simulate_checked, simulate_loan, LoanSimulation, SimulationResult,
};
