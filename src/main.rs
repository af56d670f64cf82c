use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use loan_risk::{
    score_checked, simulate_checked, ApplicantProfile, ClientType, Error, LoanSimulation,
    Profession,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Flags that describe an applicant by hand, exclusive with `--profile`
const PROFILE_FLAGS: [&str; 13] = [
    "surname",
    "first_name",
    "client_type",
    "profession",
    "income",
    "charges",
    "debt",
    "tenure",
    "incidents",
    "amount",
    "tenor",
    "age",
    "down_payment",
];

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a loan application
    Score(ScoreArgs),
    /// Simulate a loan: installment, total cost and eligibility
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// YAML profile file, instead of the flags below
    #[arg(long, conflicts_with_all = PROFILE_FLAGS)]
    profile: Option<PathBuf>,

    #[arg(long, required_unless_present = "profile")]
    surname: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    /// individual or business (default: individual)
    #[arg(long)]
    client_type: Option<ClientType>,

    /// student, junior_employee, experienced_employee, senior_employee,
    /// entrepreneur, retired or business
    #[arg(long, required_unless_present = "profile")]
    profession: Option<Profession>,

    /// Monthly net income
    #[arg(long, required_unless_present = "profile")]
    income: Option<f64>,

    /// Monthly fixed charges
    #[arg(long, required_unless_present = "profile")]
    charges: Option<f64>,

    /// Existing monthly debt repayments (default: 0)
    #[arg(long)]
    debt: Option<f64>,

    /// Years in the current job
    #[arg(long, required_unless_present = "profile")]
    tenure: Option<f64>,

    /// Payment incidents over the last 12 months (default: 0)
    #[arg(long)]
    incidents: Option<u32>,

    /// Requested loan amount
    #[arg(long, required_unless_present = "profile")]
    amount: Option<f64>,

    /// Loan duration in months
    #[arg(long, required_unless_present = "profile")]
    tenor: Option<u32>,

    /// Applicant age in years (default: 30)
    #[arg(long)]
    age: Option<u32>,

    /// Down payment (default: 0)
    #[arg(long)]
    down_payment: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Loan amount
    #[arg(long)]
    amount: f64,

    /// Loan duration in months
    #[arg(long)]
    tenor: u32,

    /// Nominal annual rate as a fraction
    #[arg(long, default_value_t = 0.15)]
    rate: f64,

    /// Monthly net income, enables the eligibility check
    #[arg(long)]
    income: Option<f64>,

    /// Monthly fixed charges
    #[arg(long, default_value_t = 0.0)]
    charges: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(name = "loan-risk")]
#[command(about = "Loan application risk scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = loan_risk::telemetry::init(cli.verbose) {
        eprintln!("Logging setup error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Score(args) => run_score(args),
        Commands::Simulate(args) => run_simulate(args),
    };
    std::process::exit(code);
}

fn run_score(args: ScoreArgs) -> i32 {
    let start_time = Instant::now();

    let profile = match &args.profile {
        Some(path) => loan_risk::input::load_profile(path),
        None => profile_from_flags(&args),
    };
    let profile = match profile {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    let result = match score_checked(&profile) {
        Ok(r) => r,
        Err(e) => return report_error("Invalid profile:", e),
    };
    debug!(elapsed = ?start_time.elapsed(), "scoring finished");

    if args.json {
        return print_json(&result);
    }

    let use_colors = loan_risk::output::should_use_colors();
    println!(
        "{}",
        loan_risk::output::format_report(&profile, &result, use_colors)
    );
    EXIT_SUCCESS
}

fn run_simulate(args: SimulateArgs) -> i32 {
    let request = LoanSimulation::new(args.amount, args.tenor)
        .with_rate(args.rate)
        .with_income(args.income.unwrap_or(0.0), args.charges);

    let result = match simulate_checked(&request) {
        Ok(r) => r,
        Err(e) => return report_error("Invalid simulation request:", e),
    };

    if args.json {
        return print_json(&result);
    }

    let use_colors = loan_risk::output::should_use_colors();
    println!(
        "{}",
        loan_risk::output::format_simulation(&result, use_colors)
    );
    EXIT_SUCCESS
}

/// Build a profile from individual flags, applying the documented defaults.
fn profile_from_flags(args: &ScoreArgs) -> Result<ApplicantProfile> {
    Ok(ApplicantProfile {
        surname: required(args.surname.clone(), "--surname")?,
        first_name: args.first_name.clone().unwrap_or_default(),
        national_id: None,
        client_type: args.client_type.unwrap_or_default(),
        profession: required(args.profession, "--profession")?,
        monthly_income: required(args.income, "--income")?,
        monthly_charges: required(args.charges, "--charges")?,
        existing_debt: args.debt.unwrap_or(0.0),
        job_tenure_years: required(args.tenure, "--tenure")?,
        payment_incidents_12m: args.incidents.unwrap_or(0),
        requested_amount: required(args.amount, "--amount")?,
        tenor_months: required(args.tenor, "--tenor")?,
        age: args.age.unwrap_or(30),
        down_payment: args.down_payment.unwrap_or(0.0),
    })
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.with_context(|| format!("{} is required unless --profile is given", flag))
}

/// Print a library error and map it to an exit code.
fn report_error(header: &str, err: Error) -> i32 {
    match err {
        Error::Validation(errors) => {
            eprintln!("{}", header);
            for error in errors {
                eprintln!("  - {}", error);
            }
            EXIT_VALIDATION
        }
        other => {
            eprintln!("Input error: {}", other);
            EXIT_CONFIG
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            EXIT_CONFIG
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_flags_build_profile_with_defaults() {
        let cli = Cli::try_parse_from([
            "loan-risk",
            "score",
            "--surname",
            "Diallo",
            "--profession",
            "experienced_employee",
            "--income",
            "450000",
            "--charges",
            "80000",
            "--tenure",
            "4",
            "--amount",
            "5000000",
            "--tenor",
            "36",
        ])
        .unwrap();
        let Commands::Score(args) = cli.command else {
            panic!("expected score command");
        };
        let profile = profile_from_flags(&args).unwrap();
        assert_eq!(profile.profession, Profession::ExperiencedEmployee);
        assert_eq!(profile.client_type, ClientType::Individual);
        assert_eq!(profile.existing_debt, 0.0);
        assert_eq!(profile.payment_incidents_12m, 0);
        assert_eq!(profile.age, 30);
        assert_eq!(profile.tenor_months, 36);
    }

    #[test]
    fn test_score_requires_flags_without_profile() {
        let result = Cli::try_parse_from(["loan-risk", "score", "--surname", "Diallo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_conflicts_with_flags() {
        let result = Cli::try_parse_from([
            "loan-risk",
            "score",
            "--profile",
            "applicant.yaml",
            "--income",
            "1000",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["loan-risk", "score", "--profile", "applicant.yaml", "--json"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Score(ScoreArgs { json: true, .. })));
    }

    #[test]
    fn test_unknown_profession_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "loan-risk",
            "score",
            "--surname",
            "Diallo",
            "--profession",
            "astronaut",
            "--income",
            "450000",
            "--charges",
            "80000",
            "--tenure",
            "4",
            "--amount",
            "5000000",
            "--tenor",
            "36",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::try_parse_from(["loan-risk", "simulate", "--amount", "1000000", "--tenor", "24"])
            .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate command");
        };
        assert_eq!(args.rate, 0.15);
        assert_eq!(args.charges, 0.0);
        assert!(args.income.is_none());
        assert!(!args.json);
    }
}
