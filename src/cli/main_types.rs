use crate::api::models::{EmploymentStatus, LoanStatus, PaymentMethod};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "loan-checkout")]
#[command(about = "Command line client for the loan-checkout service")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Server origin, overriding the profile (e.g. http://localhost:8080)
    #[arg(long, global = true, env = "LOAN_CHECKOUT_SERVER_URL")]
    pub server_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Loan applications and loans
    Loan {
        #[command(subcommand)]
        command: LoanCommands,
    },
    /// Payments against a loan
    Payment {
        #[command(subcommand)]
        command: PaymentCommands,
    },
    /// Check that the service is up
    Health,
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LoanCommands {
    /// Submit a loan application
    Apply {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        term_months: u32,
        /// EMPLOYED, SELF_EMPLOYED, UNEMPLOYED, RETIRED or STUDENT
        #[arg(long, value_parser = parse_wire::<EmploymentStatus>)]
        employment_status: EmploymentStatus,
        /// Applicant name
        #[arg(long)]
        name: String,
        /// Applicant email
        #[arg(long)]
        email: String,
        #[arg(long)]
        annual_income: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List loans
    List {
        /// Only loans in this status (e.g. ACTIVE, PAID_OFF)
        #[arg(long, value_parser = parse_wire::<LoanStatus>)]
        status: Option<LoanStatus>,
    },
    /// Show one loan
    Show {
        /// Loan ID
        id: String,
    },
    /// Change fields of a loan
    Update {
        /// Loan ID
        id: String,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        term_months: Option<u32>,
        #[arg(long, value_parser = parse_wire::<EmploymentStatus>)]
        employment_status: Option<EmploymentStatus>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a loan
    Cancel {
        /// Loan ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommands {
    /// Record a payment
    Make {
        /// Loan ID
        loan_id: String,
        #[arg(long)]
        amount: f64,
        /// BANK_TRANSFER, CREDIT_CARD or DIRECT_DEBIT
        #[arg(long, value_parser = parse_wire::<PaymentMethod>)]
        method: PaymentMethod,
        #[arg(long)]
        reference: Option<String>,
    },
    /// List the payments of a loan
    List {
        /// Loan ID
        loan_id: String,
    },
    /// Show one payment
    Show {
        /// Loan ID
        loan_id: String,
        /// Payment ID
        payment_id: String,
    },
    /// Totals and next due date of a loan
    Summary {
        /// Loan ID
        loan_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (server-url, timeout-seconds)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Parse a wire enum name, accepting any case and `-` for `_`.
pub fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let name = raw.trim().replace('-', "_").to_uppercase();
    serde_json::from_value(serde_json::Value::String(name))
        .map_err(|_| format!("unknown value '{}'", raw))
}
