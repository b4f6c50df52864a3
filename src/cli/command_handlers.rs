use crate::api::models::{CreatePayment, LoanApplication, UpdateLoan};
use crate::cli::main_types::{ConfigCommands, LoanCommands, PaymentCommands};
use crate::core::services::traits::{HealthOperations, LoanOperations, PaymentOperations};
use crate::core::views::{LoanView, PaymentsView};
use crate::display::TableDisplay;
use crate::error::{AppError, CliError};
use crate::storage::config::Config;
use crate::utils::logging::print_verbose;
use crate::utils::validation::{validate_amount, validate_email};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
pub struct LoanHandler;

impl LoanHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: LoanCommands,
        loans: Arc<dyn LoanOperations>,
        display: &TableDisplay,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            LoanCommands::Apply {
                amount,
                term_months,
                employment_status,
                name,
                email,
                annual_income,
                notes,
            } => {
                print_verbose(verbose, "Submitting loan application");
                validate_amount("amount", amount)?;
                validate_amount("annual-income", annual_income)?;
                validate_email(&email)?;
                if term_months == 0 {
                    return Err(CliError::InvalidArguments(
                        "term-months must be at least 1".to_string(),
                    )
                    .into());
                }

                let application = LoanApplication {
                    amount,
                    term_months,
                    employment_status,
                    applicant_name: name,
                    applicant_email: email,
                    annual_income,
                    notes,
                };
                let result = loans.apply(&application).await?;
                println!("{}", display.render_loan_result(&result));
                Ok(())
            }
            LoanCommands::List { status } => {
                print_verbose(verbose, &format!("Listing loans - status: {:?}", status));
                let found = loans.list(status).await?;
                println!("{}", display.render_loans(&found));
                Ok(())
            }
            LoanCommands::Show { id } => {
                print_verbose(verbose, &format!("Fetching loan {}", id));
                let view = LoanView::new(loans);
                view.load(&id).await;

                if let Some(err) = view.error() {
                    return Err(err.into());
                }
                if let Some(loan) = view.loan() {
                    println!("{}", display.render_loan(&loan));
                }
                Ok(())
            }
            LoanCommands::Update {
                id,
                amount,
                term_months,
                employment_status,
                notes,
            } => {
                let patch = UpdateLoan {
                    amount,
                    term_months,
                    employment_status,
                    notes,
                };
                if patch.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "Nothing to update. Pass at least one of --amount, --term-months, --employment-status, --notes".to_string(),
                    )
                    .into());
                }
                if let Some(amount) = patch.amount {
                    validate_amount("amount", amount)?;
                }

                print_verbose(verbose, &format!("Updating loan {} with {:?}", id, patch));
                let updated = loans.update(&id, &patch).await?;
                println!("✅ Loan {} updated", updated.id);
                println!("{}", display.render_loan(&updated));
                Ok(())
            }
            LoanCommands::Cancel { id } => {
                print_verbose(verbose, &format!("Deleting loan {}", id));
                loans.delete(&id).await?;
                println!("✅ Loan {} cancelled", id);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct PaymentHandler;

impl PaymentHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: PaymentCommands,
        payments: Arc<dyn PaymentOperations>,
        display: &TableDisplay,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            PaymentCommands::Make {
                loan_id,
                amount,
                method,
                reference,
            } => {
                validate_amount("amount", amount)?;
                print_verbose(
                    verbose,
                    &format!("Recording {} payment of {} for loan {}", method, amount, loan_id),
                );

                let input = CreatePayment {
                    amount,
                    method,
                    reference,
                };
                let payment = payments.make_payment(&loan_id, &input).await?;
                println!("✅ Payment {} recorded", payment.id);
                println!("{}", display.render_payment(&payment));
                Ok(())
            }
            PaymentCommands::List { loan_id } => {
                print_verbose(verbose, &format!("Listing payments of loan {}", loan_id));
                let view = PaymentsView::new(payments);
                view.load(&loan_id).await;

                if let Some(err) = view.error() {
                    return Err(err.into());
                }
                println!("{}", display.render_payments(&view.payments()));
                Ok(())
            }
            PaymentCommands::Show {
                loan_id,
                payment_id,
            } => {
                print_verbose(
                    verbose,
                    &format!("Fetching payment {} of loan {}", payment_id, loan_id),
                );
                let payment = payments.get_payment(&loan_id, &payment_id).await?;
                println!("{}", display.render_payment(&payment));
                Ok(())
            }
            PaymentCommands::Summary { loan_id } => {
                print_verbose(verbose, &format!("Fetching payment summary of loan {}", loan_id));
                let summary = payments.summary(&loan_id).await?;
                println!("{}", display.render_summary(&loan_id, &summary));
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct HealthHandler;

impl HealthHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        health: &dyn HealthOperations,
        display: &TableDisplay,
        verbose: bool,
    ) -> Result<(), AppError> {
        print_verbose(verbose, "Checking service health");
        let status = health.check().await?;
        println!("{}", display.render_health(&status));
        Ok(())
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &mut Config,
        profile_name: &str,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Attempting config show command");

                println!("Current Configuration:");
                println!("=====================");

                match &config.default_profile {
                    Some(default_profile) => println!("Default Profile: {}", default_profile),
                    None => println!("Default Profile: (not set)"),
                }

                println!("\nProfiles:");
                if config.profiles.is_empty() {
                    println!("  No profiles configured");
                } else {
                    let mut names: Vec<&String> = config.profiles.keys().collect();
                    names.sort();
                    for name in names {
                        let profile = &config.profiles[name];
                        println!("  [{}]", name);
                        println!("    Server URL: {}", profile.server_url);
                        if let Some(timeout) = profile.timeout_seconds {
                            println!("    Timeout: {} seconds", timeout);
                        }
                    }
                }

                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                print_verbose(
                    verbose,
                    &format!(
                        "Attempting config set - profile: {}, key: {}, value: {}",
                        profile_name, key, value
                    ),
                );

                let mut profile = config.get_profile(profile_name).cloned().unwrap_or_default();
                profile.set_value(&key, &value)?;
                config.set_profile(profile_name.to_string(), profile);
                if config.default_profile.is_none() {
                    config.default_profile = Some(profile_name.to_string());
                }

                config.save(config_path)?;
                println!("✅ Set profile '{}' {} to: {}", profile_name, key, value);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        EmploymentStatus, LoanDetail, LoanResult, LoanStatus, Payment, PaymentMethod,
        PaymentSummary,
    };
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingLoans {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LoanOperations for RecordingLoans {
        async fn apply(&self, application: &LoanApplication) -> Result<LoanResult, ApiError> {
            self.calls.lock().unwrap().push("apply".to_string());
            Ok(LoanResult::Rejected {
                reason: format!("{} is over the limit", application.amount),
            })
        }

        async fn list(&self, _: Option<LoanStatus>) -> Result<Vec<LoanDetail>, ApiError> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(Vec::new())
        }

        async fn get(&self, loan_id: &str) -> Result<LoanDetail, ApiError> {
            self.calls.lock().unwrap().push(format!("get {}", loan_id));
            Err(ApiError::new(404, "Loan not found", None))
        }

        async fn update(&self, loan_id: &str, _: &UpdateLoan) -> Result<LoanDetail, ApiError> {
            self.calls.lock().unwrap().push(format!("update {}", loan_id));
            Err(ApiError::new(500, "", None))
        }

        async fn delete(&self, loan_id: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("delete {}", loan_id));
            Ok(())
        }
    }

    struct EmptyPayments;

    #[async_trait]
    impl PaymentOperations for EmptyPayments {
        async fn make_payment(&self, _: &str, _: &CreatePayment) -> Result<Payment, ApiError> {
            Err(ApiError::new(422, "Payment exceeds balance", None))
        }

        async fn list_payments(&self, _: &str) -> Result<Vec<Payment>, ApiError> {
            Ok(Vec::new())
        }

        async fn get_payment(&self, _: &str, _: &str) -> Result<Payment, ApiError> {
            Err(ApiError::new(404, "Payment not found", None))
        }

        async fn summary(&self, _: &str) -> Result<PaymentSummary, ApiError> {
            Err(ApiError::new(404, "Loan not found", None))
        }
    }

    fn display() -> TableDisplay {
        TableDisplay::new().with_colors(false)
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_email_before_calling() {
        let loans = Arc::new(RecordingLoans::default());
        let result = LoanHandler::new()
            .handle(
                LoanCommands::Apply {
                    amount: 1000.0,
                    term_months: 12,
                    employment_status: EmploymentStatus::Employed,
                    name: "John Doe".to_string(),
                    email: "not-an-email".to_string(),
                    annual_income: 50000.0,
                    notes: None,
                },
                loans.clone(),
                &display(),
                false,
            )
            .await;

        assert!(matches!(result, Err(AppError::Cli(CliError::InvalidArguments(_)))));
        assert!(loans.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_application_is_not_an_error() {
        let loans = Arc::new(RecordingLoans::default());
        let result = LoanHandler::new()
            .handle(
                LoanCommands::Apply {
                    amount: 900000.0,
                    term_months: 12,
                    employment_status: EmploymentStatus::Student,
                    name: "John Doe".to_string(),
                    email: "john@example.com".to_string(),
                    annual_income: 1000.0,
                    notes: None,
                },
                loans.clone(),
                &display(),
                false,
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(*loans.calls.lock().unwrap(), vec!["apply".to_string()]);
    }

    #[tokio::test]
    async fn test_show_surfaces_view_error() {
        let loans = Arc::new(RecordingLoans::default());
        let result = LoanHandler::new()
            .handle(
                LoanCommands::Show {
                    id: "loan-404".to_string(),
                },
                loans,
                &display(),
                false,
            )
            .await;

        match result {
            Err(AppError::Api(err)) => assert_eq!(err.status, 404),
            other => panic!("expected API error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let loans = Arc::new(RecordingLoans::default());
        let result = LoanHandler::new()
            .handle(
                LoanCommands::Update {
                    id: "loan-1".to_string(),
                    amount: None,
                    term_months: None,
                    employment_status: None,
                    notes: None,
                },
                loans.clone(),
                &display(),
                false,
            )
            .await;

        assert!(matches!(result, Err(AppError::Cli(_))));
        assert!(loans.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_calls_delete() {
        let loans = Arc::new(RecordingLoans::default());
        LoanHandler::new()
            .handle(
                LoanCommands::Cancel {
                    id: "loan-7".to_string(),
                },
                loans.clone(),
                &display(),
                true,
            )
            .await
            .expect("cancel should succeed");

        assert_eq!(*loans.calls.lock().unwrap(), vec!["delete loan-7".to_string()]);
    }

    #[tokio::test]
    async fn test_payment_list_empty_and_make_failure() {
        let handler = PaymentHandler::new();
        let payments: Arc<dyn PaymentOperations> = Arc::new(EmptyPayments);

        let listed = handler
            .handle(
                PaymentCommands::List {
                    loan_id: "loan-1".to_string(),
                },
                payments.clone(),
                &display(),
                false,
            )
            .await;
        assert!(listed.is_ok());

        let made = handler
            .handle(
                PaymentCommands::Make {
                    loan_id: "loan-1".to_string(),
                    amount: 50.0,
                    method: PaymentMethod::CreditCard,
                    reference: None,
                },
                payments,
                &display(),
                false,
            )
            .await;
        match made {
            Err(AppError::Api(err)) => assert_eq!(err.message, "Payment exceeds balance"),
            other => panic!("expected API error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_config_set_saves_profile() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = Config::file_in(temp_dir.path());
        let mut config = Config::default();

        ConfigHandler::new()
            .handle(
                ConfigCommands::Set {
                    key: "server-url".to_string(),
                    value: "https://loans.example.test".to_string(),
                },
                &mut config,
                "staging",
                Some(config_path.clone()),
                false,
            )
            .expect("config set should succeed");

        let saved = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(saved.default_profile.as_deref(), Some("staging"));
        assert_eq!(
            saved.get_profile("staging").map(|p| p.server_url.as_str()),
            Some("https://loans.example.test")
        );
    }

    #[test]
    fn test_config_set_unknown_key() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = Config::file_in(temp_dir.path());
        let mut config = Config::default();

        let result = ConfigHandler::new().handle(
            ConfigCommands::Set {
                key: "colour".to_string(),
                value: "blue".to_string(),
            },
            &mut config,
            "default",
            Some(config_path.clone()),
            false,
        );

        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(!config_path.exists());
    }

    #[test]
    fn test_config_show() {
        let mut config = Config::default();
        let result =
            ConfigHandler::new().handle(ConfigCommands::Show, &mut config, "default", None, true);
        assert!(result.is_ok());
    }
}
