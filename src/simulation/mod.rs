//! Loan simulation: installment, total cost, eligibility and a partial
//! amortization schedule.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result, ValidationError};
use crate::profile::check_non_negative;
use crate::scoring::{round_to, MAX_TENOR_MONTHS, NOMINAL_ANNUAL_RATE};

/// Debt ratio under which a simulated loan is eligible.
const ELIGIBILITY_RATIO: f64 = 0.33;
/// Schedule rows kept from the start of the loan.
const SCHEDULE_HEAD: u32 = 3;

/// Fixed monthly payment of an amortizing loan (annuity formula).
///
/// With a zero monthly rate the principal is split evenly over the tenor,
/// a tenor of 0 counting as 1. Written with the discount factor
/// `(1 + r)^-n` so very long tenors tend to `principal * r` instead of
/// overflowing.
pub fn monthly_installment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    let rate = annual_rate / 12.0;
    if rate > 0.0 && months > 0 {
        let discount = (1.0 + rate).powf(-f64::from(months));
        principal * rate / (1.0 - discount)
    } else {
        principal / months.max(1) as f64
    }
}

/// Simulation request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LoanSimulation {
    pub amount: f64,
    pub tenor_months: u32,
    /// Nominal annual rate as a fraction, 0.15 by default
    #[serde(default = "default_rate")]
    pub annual_rate: f64,
    /// 0 when unknown
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub monthly_charges: f64,
}

fn default_rate() -> f64 {
    NOMINAL_ANNUAL_RATE
}

impl LoanSimulation {
    pub fn new(amount: f64, tenor_months: u32) -> Self {
        Self {
            amount,
            tenor_months,
            annual_rate: NOMINAL_ANNUAL_RATE,
            monthly_income: 0.0,
            monthly_charges: 0.0,
        }
    }

    pub fn with_rate(mut self, annual_rate: f64) -> Self {
        self.annual_rate = annual_rate;
        self
    }

    pub fn with_income(mut self, monthly_income: f64, monthly_charges: f64) -> Self {
        self.monthly_income = monthly_income;
        self.monthly_charges = monthly_charges;
        self
    }

    /// Returns all validation errors at once.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = [
            ("amount", self.amount),
            ("annual_rate", self.annual_rate),
            ("monthly_income", self.monthly_income),
            ("monthly_charges", self.monthly_charges),
        ]
        .into_iter()
        .filter_map(|(field, value)| check_non_negative(field, value).err())
        .collect();

        if self.tenor_months == 0 {
            errors.push(ValidationError::new("tenor_months", "must be at least 1"));
        } else if self.tenor_months > MAX_TENOR_MONTHS {
            errors.push(ValidationError::new(
                "tenor_months",
                format!(
                    "must be at most {}, got {}",
                    MAX_TENOR_MONTHS, self.tenor_months
                ),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AmortizationRow {
    /// 1-based
    pub month: u32,
    pub installment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Floored at 0
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationResult {
    pub amount: f64,
    pub tenor_months: u32,
    /// Percent
    pub annual_rate_pct: f64,
    /// Percent, 3 decimals
    pub monthly_rate_pct: f64,
    pub installment: f64,
    pub total_cost: f64,
    /// Total cost minus principal
    pub credit_cost: f64,
    /// Income minus charges, 0 without income
    pub repayment_capacity: f64,
    /// Installment over income in percent, 1 decimal; 0 without income
    pub debt_ratio_pct: f64,
    /// `None` when no income was supplied: eligibility is unknown, not false
    pub eligible: Option<bool>,
    /// Months 1-3 and the last two months only
    pub schedule: Vec<AmortizationRow>,
}

/// Simulate a loan. Money amounts in the result are rounded to whole units.
pub fn simulate_loan(request: &LoanSimulation) -> SimulationResult {
    let monthly_rate = request.annual_rate / 12.0;
    let months = request.tenor_months;
    let installment = monthly_installment(request.amount, request.annual_rate, months);

    let total_cost = installment * months as f64;
    let credit_cost = total_cost - request.amount;

    let has_income = request.monthly_income > 0.0;
    let repayment_capacity = if has_income {
        request.monthly_income - request.monthly_charges
    } else {
        0.0
    };
    let debt_ratio = if has_income {
        installment / request.monthly_income
    } else {
        0.0
    };
    let eligible = has_income.then_some(debt_ratio < ELIGIBILITY_RATIO);

    let schedule = partial_schedule(request.amount, monthly_rate, installment, months);
    debug!(
        installment,
        total_cost,
        ?eligible,
        rows = schedule.len(),
        "loan simulated"
    );

    SimulationResult {
        amount: request.amount,
        tenor_months: months,
        annual_rate_pct: request.annual_rate * 100.0,
        monthly_rate_pct: round_to(monthly_rate * 100.0, 3),
        installment: round_to(installment, 0),
        total_cost: round_to(total_cost, 0),
        credit_cost: round_to(credit_cost, 0),
        repayment_capacity: round_to(repayment_capacity, 0),
        debt_ratio_pct: round_to(debt_ratio * 100.0, 1),
        eligible,
        schedule,
    }
}

/// Validate `request`, then simulate it.
pub fn simulate_checked(request: &LoanSimulation) -> Result<SimulationResult> {
    request.validate().map_err(Error::Validation)?;
    Ok(simulate_loan(request))
}

/// Walk the full schedule, keeping the first three and last two months.
fn partial_schedule(
    amount: f64,
    monthly_rate: f64,
    installment: f64,
    months: u32,
) -> Vec<AmortizationRow> {
    let tail_start = months.saturating_sub(1);
    let mut balance = amount;
    let mut rows = Vec::new();

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal = installment - interest;
        balance -= principal;
        if month <= SCHEDULE_HEAD || month >= tail_start {
            rows.push(AmortizationRow {
                month,
                installment: round_to(installment, 0),
                principal: round_to(principal, 0),
                interest: round_to(interest, 0),
                remaining_balance: round_to(balance.max(0.0), 0),
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_annuity_formula() {
        // 1,200,000 at 12% over 12 months: r = 1%
        let r: f64 = 0.01;
        let growth = 1.01f64.powi(12);
        let expected = 1_200_000.0 * (r * growth) / (growth - 1.0);
        let installment = monthly_installment(1_200_000.0, 0.12, 12);
        assert!((installment - expected).abs() < 1e-6);
        assert!((installment - 106_618.55).abs() < 0.01);
    }

    #[test]
    fn test_installment_zero_rate_is_flat() {
        assert_eq!(monthly_installment(1_200_000.0, 0.0, 12), 100_000.0);
    }

    #[test]
    fn test_installment_zero_tenor_counts_as_one() {
        assert_eq!(monthly_installment(500_000.0, 0.15, 0), 500_000.0);
    }

    #[test]
    fn test_installment_finite_for_huge_tenors() {
        let at_max = monthly_installment(5_000_000.0, 0.15, MAX_TENOR_MONTHS);
        assert!(at_max.is_finite());
        // Past 600 months the loan is nearly interest-only: 5,000,000 * 1.25%
        assert!(at_max > 62_500.0 && at_max < 62_600.0);

        for months in [60_000, u32::MAX] {
            let installment = monthly_installment(5_000_000.0, 0.15, months);
            assert!(installment.is_finite());
            assert!((installment - 62_500.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_validate_rejects_tenor_over_max() {
        let errors = LoanSimulation::new(5_000_000.0, MAX_TENOR_MONTHS + 1)
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "tenor_months");
        assert!(errors[0].reason.contains("at most 600"));

        let request = LoanSimulation::new(5_000_000.0, MAX_TENOR_MONTHS);
        assert!(request.validate().is_ok());
        let result = simulate_checked(&request).unwrap();
        assert!(result.installment.is_finite());
        assert!(result.total_cost.is_finite());
        assert_eq!(result.schedule.last().unwrap().month, MAX_TENOR_MONTHS);

        let err = simulate_checked(&LoanSimulation::new(5_000_000.0, 60_000)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_simulation_without_income_has_unknown_eligibility() {
        let result = simulate_loan(&LoanSimulation::new(1_000_000.0, 24));
        assert_eq!(result.eligible, None);
        assert_eq!(result.debt_ratio_pct, 0.0);
        assert_eq!(result.repayment_capacity, 0.0);
    }

    #[test]
    fn test_simulation_eligibility() {
        let request = LoanSimulation::new(1_000_000.0, 24).with_income(500_000.0, 100_000.0);
        let result = simulate_loan(&request);
        // ~48,487 / 500,000 = 9.7%
        assert_eq!(result.eligible, Some(true));
        assert_eq!(result.repayment_capacity, 400_000.0);
        assert!((result.debt_ratio_pct - 9.7).abs() < 0.05);

        let request = LoanSimulation::new(10_000_000.0, 24).with_income(500_000.0, 0.0);
        let result = simulate_loan(&request);
        assert_eq!(result.eligible, Some(false));
    }

    #[test]
    fn test_simulation_costs_and_rates() {
        let result = simulate_loan(&LoanSimulation::new(1_200_000.0, 12).with_rate(0.12));
        assert!((result.annual_rate_pct - 12.0).abs() < 1e-9);
        assert_eq!(result.monthly_rate_pct, 1.0);
        assert_eq!(result.installment, 106_619.0);
        let raw = monthly_installment(1_200_000.0, 0.12, 12);
        assert_eq!(result.total_cost, round_to(raw * 12.0, 0));
        assert_eq!(result.credit_cost, round_to(raw * 12.0 - 1_200_000.0, 0));
    }

    #[test]
    fn test_schedule_keeps_head_and_tail() {
        let result = simulate_loan(&LoanSimulation::new(1_200_000.0, 12).with_rate(0.12));
        let months: Vec<u32> = result.schedule.iter().map(|row| row.month).collect();
        assert_eq!(months, vec![1, 2, 3, 11, 12]);

        let first = result.schedule[0];
        assert_eq!(first.interest, 12_000.0);
        assert_eq!(first.principal, round_to(monthly_installment(1_200_000.0, 0.12, 12) - 12_000.0, 0));
        assert_eq!(result.schedule.last().unwrap().remaining_balance, 0.0);
    }

    #[test]
    fn test_short_schedule_has_no_duplicates() {
        let result = simulate_loan(&LoanSimulation::new(300_000.0, 4));
        let months: Vec<u32> = result.schedule.iter().map(|row| row.month).collect();
        assert_eq!(months, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let result = simulate_loan(&LoanSimulation::new(600_000.0, 6).with_rate(0.0));
        assert_eq!(result.installment, 100_000.0);
        assert_eq!(result.credit_cost, 0.0);
        assert!(result.schedule.iter().all(|row| row.interest == 0.0));
        assert_eq!(result.schedule[0].remaining_balance, 500_000.0);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let request = LoanSimulation {
            amount: -1.0,
            tenor_months: 0,
            annual_rate: f64::INFINITY,
            monthly_income: 0.0,
            monthly_charges: 0.0,
        };
        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["amount", "annual_rate", "tenor_months"]);
        assert!(LoanSimulation::new(1.0, 1).validate().is_ok());
    }
}
