use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::profile::ApplicantProfile;
use crate::scoring::{format_amount, round_to, RiskTier, ScoringResult, CURRENCY};
use crate::simulation::SimulationResult;

/// Report rules never get wider than this
const MAX_RULE_WIDTH: usize = 60;
/// Or narrower than this
const MIN_RULE_WIDTH: usize = 20;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 score as "66.53/100", dropping needless zeros ("100/100")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.2}", score);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{}/100", trimmed)
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn rule_width() -> usize {
    get_terminal_width()
        .map(|w| w.clamp(MIN_RULE_WIDTH, MAX_RULE_WIDTH))
        .unwrap_or(MAX_RULE_WIDTH)
}

fn tier_colored(tier: RiskTier, use_colors: bool) -> String {
    let label = tier.label();
    if !use_colors {
        return label.to_string();
    }
    match tier {
        RiskTier::VeryLow | RiskTier::Low => label.green().to_string(),
        RiskTier::Moderate => label.yellow().to_string(),
        RiskTier::High | RiskTier::VeryHigh | RiskTier::Critical => label.red().to_string(),
    }
}

/// Format the full scoring report for a terminal
pub fn format_report(
    profile: &ApplicantProfile,
    result: &ScoringResult,
    use_colors: bool,
) -> String {
    let width = rule_width();
    let heavy = "=".repeat(width);
    let light = "-".repeat(width);
    let mut lines = Vec::new();

    let title = "LOAN RISK SCORING REPORT";
    lines.push(heavy.clone());
    if use_colors {
        lines.push(format!("  {}", title.bold()));
    } else {
        lines.push(format!("  {}", title));
    }
    lines.push(heavy.clone());

    lines.push(String::new());
    lines.push(format!("  Client: {}", profile.display_name()));
    if let Some(id) = &profile.national_id {
        lines.push(format!("  National ID: {}", id));
    }
    lines.push(format!(
        "  Profile: {} / {}",
        profile.client_type, profile.profession
    ));
    lines.push(format!(
        "  Requested amount: {} {} over {} months",
        format_amount(profile.requested_amount),
        CURRENCY,
        profile.tenor_months
    ));
    if profile.down_payment > 0.0 {
        lines.push(format!(
            "  Down payment: {} {}",
            format_amount(profile.down_payment),
            CURRENCY
        ));
    }

    lines.push(light.clone());
    let risk_score = format_score(result.global_score);
    let fraud_score = format_score(result.fraud_score);
    if use_colors {
        lines.push(format!(
            "  RISK SCORE:  {} ({})",
            risk_score.bold(),
            tier_colored(result.risk_tier, true)
        ));
        lines.push(format!("  FRAUD SCORE: {}", fraud_score.bold()));
    } else {
        lines.push(format!(
            "  RISK SCORE:  {} ({})",
            risk_score,
            tier_colored(result.risk_tier, false)
        ));
        lines.push(format!("  FRAUD SCORE: {}", fraud_score));
    }
    lines.push(light.clone());

    let c = &result.components;
    lines.push("  Breakdown:".to_string());
    lines.push(format!(
        "    Debt ratio:      {} (ratio: {:.1}%)",
        format_score(c.debt_ratio),
        result.debt_ratio * 100.0
    ));
    lines.push(format!("    Payment history: {}", format_score(c.payment_history)));
    lines.push(format!("    Job stability:   {}", format_score(c.stability)));
    lines.push(format!("    Coherence:       {}", format_score(c.coherence)));
    lines.push(format!(
        "    Est. installment: {} {} (capacity: {} {})",
        format_amount(result.details.estimated_installment),
        CURRENCY,
        format_amount(result.details.repayment_capacity),
        CURRENCY
    ));

    if !result.important_factors.is_empty() {
        lines.push(String::new());
        lines.push("  Key factors:".to_string());
        for factor in &result.important_factors {
            let impact = if use_colors {
                if factor.impact.is_unfavorable() {
                    factor.impact.label().red().to_string()
                } else {
                    factor.impact.label().green().to_string()
                }
            } else {
                factor.impact.label().to_string()
            };
            lines.push(format!(
                "    {} [{}]: {}",
                factor.factor, impact, factor.detail
            ));
        }
    }

    if !result.alerts.is_empty() {
        lines.push(String::new());
        lines.push("  Alerts:".to_string());
        for alert in &result.alerts {
            if use_colors {
                lines.push(format!("    ! {}", alert.yellow()));
            } else {
                lines.push(format!("    ! {}", alert));
            }
        }
    }

    lines.push(light);
    lines.push("  EXPLANATION:".to_string());
    for line in result.explanation.lines() {
        lines.push(format!("  {}", line));
    }
    lines.push(String::new());
    lines.push(format!("  RECOMMENDATION: {}", result.recommendation));
    if result.fraud_flag {
        lines.push(String::new());
        let banner = "*** FRAUD ALERT DETECTED ***";
        if use_colors {
            lines.push(format!("  {}", banner.red().bold()));
        } else {
            lines.push(format!("  {}", banner));
        }
    }
    lines.push(heavy);

    lines.join("\n")
}

/// Format a loan simulation for a terminal
pub fn format_simulation(result: &SimulationResult, use_colors: bool) -> String {
    let width = rule_width();
    let light = "-".repeat(width);
    let mut lines = Vec::new();

    let installment = format!("{} {}", format_amount(result.installment), CURRENCY);
    lines.push(format!(
        "Loan of {} {} over {} months at {}% ({}% monthly)",
        format_amount(result.amount),
        CURRENCY,
        result.tenor_months,
        round_to(result.annual_rate_pct, 3),
        result.monthly_rate_pct
    ));
    if use_colors {
        lines.push(format!("  Installment:  {}", installment.bold()));
    } else {
        lines.push(format!("  Installment:  {}", installment));
    }
    lines.push(format!(
        "  Total cost:   {} {}",
        format_amount(result.total_cost),
        CURRENCY
    ));
    lines.push(format!(
        "  Credit cost:  {} {}",
        format_amount(result.credit_cost),
        CURRENCY
    ));

    match result.eligible {
        Some(eligible) => {
            lines.push(format!(
                "  Capacity:     {} {}",
                format_amount(result.repayment_capacity),
                CURRENCY
            ));
            lines.push(format!("  Debt ratio:   {:.1}%", result.debt_ratio_pct));
            let verdict = if eligible { "yes" } else { "no" };
            let verdict = match (use_colors, eligible) {
                (false, _) => verdict.to_string(),
                (true, true) => verdict.green().to_string(),
                (true, false) => verdict.red().to_string(),
            };
            lines.push(format!("  Eligible:     {}", verdict));
        }
        None => lines.push("  Eligible:     unknown (no income supplied)".to_string()),
    }

    if !result.schedule.is_empty() {
        lines.push(light);
        lines.push(format!(
            "  {:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
            "Month", "Installment", "Principal", "Interest", "Remaining"
        ));
        let mut previous = 0;
        for row in &result.schedule {
            if previous != 0 && row.month > previous + 1 {
                lines.push(format!("  {:>5}", "..."));
            }
            previous = row.month;
            lines.push(format!(
                "  {:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
                row.month,
                format_amount(row.installment),
                format_amount(row.principal),
                format_amount(row.interest),
                format_amount(row.remaining_balance)
            ));
        }
    }

    lines.join("\n")
}
