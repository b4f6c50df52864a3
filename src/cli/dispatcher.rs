use crate::api::client::{LoanApiClient, install_shared, shared};
use crate::cli::command_handlers::{ConfigHandler, HealthHandler, LoanHandler, PaymentHandler};
use crate::cli::main_types::{Commands, ConfigCommands};
use crate::core::services::{HealthService, LoanService, PaymentService};
use crate::display::TableDisplay;
use crate::error::{AppError, CliError};
use crate::storage::config::{Config, Profile};
use crate::utils::logging::print_verbose;
use crate::utils::validation::validate_url;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    profile_name: String,
    server_url: Option<String>,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        profile_name: Option<String>,
        server_url: Option<String>,
        verbose: bool,
    ) -> Self {
        let profile_name =
            profile_name.unwrap_or_else(|| config.active_profile_name().to_string());
        print_verbose(verbose, &format!("Using profile: {}", profile_name));

        Self {
            config,
            config_path,
            profile_name,
            server_url,
            verbose,
        }
    }

    // Instance method for verbose logging
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        let display = TableDisplay::new();

        match command {
            Commands::Config { command } => self.handle_config_command(command),
            Commands::Loan { command } => {
                let loans = Arc::new(LoanService::new(self.create_client()?));
                LoanHandler::new()
                    .handle(command, loans, &display, self.verbose)
                    .await
            }
            Commands::Payment { command } => {
                let payments = Arc::new(PaymentService::new(self.create_client()?));
                PaymentHandler::new()
                    .handle(command, payments, &display, self.verbose)
                    .await
            }
            Commands::Health => {
                let health = HealthService::new(self.create_client()?);
                HealthHandler::new()
                    .handle(&health, &display, self.verbose)
                    .await
            }
        }
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        let mut config = self.config.clone();
        ConfigHandler::new().handle(
            command,
            &mut config,
            &self.profile_name,
            self.config_path.clone(),
            self.verbose,
        )
    }

    /// Profile settings with the `--server-url` override applied.
    ///
    /// An unconfigured "default" profile falls back to the built-in server
    /// URL; any other missing profile is an error.
    pub fn resolve_profile(&self) -> Result<Profile, AppError> {
        let mut profile = match self.config.get_profile(&self.profile_name) {
            Some(profile) => profile.clone(),
            None if self.profile_name == "default" => Profile::default(),
            None => {
                return Err(CliError::ProfileNotFound {
                    profile: self.profile_name.clone(),
                }
                .into());
            }
        };

        if let Some(server_url) = &self.server_url {
            validate_url(server_url)?;
            self.log_verbose(&format!("Overriding server URL with {}", server_url));
            profile.server_url = server_url.clone();
        }

        Ok(profile)
    }

    fn create_client(&self) -> Result<Arc<LoanApiClient>, AppError> {
        if let Some(client) = shared() {
            return Ok(client);
        }

        let profile = self.resolve_profile()?;
        let client_config = profile.client_config();
        self.log_verbose(&format!(
            "Connecting to {} (timeout {:?})",
            client_config.base_address, client_config.timeout
        ));

        let client = LoanApiClient::new(client_config)?;
        Ok(install_shared(client)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn create_test_config() -> Config {
        let mut profiles = HashMap::new();
        profiles.insert(
            "test".to_string(),
            Profile {
                server_url: "http://loans.example.test".to_string(),
                timeout_seconds: Some(30),
            },
        );
        Config {
            default_profile: Some("test".to_string()),
            profiles,
        }
    }

    #[test]
    fn test_dispatcher_uses_default_profile() {
        let d = Dispatcher::new(create_test_config(), None, None, None, true);
        assert_eq!(d.profile_name, "test");

        let profile = d.resolve_profile().expect("profile exists");
        assert_eq!(profile.server_url, "http://loans.example.test");
        assert_eq!(profile.timeout_seconds, Some(30));
    }

    #[test]
    fn test_server_url_override() {
        let d = Dispatcher::new(
            create_test_config(),
            None,
            None,
            Some("http://localhost:9999".to_string()),
            false,
        );
        let profile = d.resolve_profile().expect("profile exists");
        assert_eq!(profile.server_url, "http://localhost:9999");
        assert_eq!(profile.timeout_seconds, Some(30));
    }

    #[test]
    fn test_invalid_server_url_override() {
        let d = Dispatcher::new(
            create_test_config(),
            None,
            None,
            Some("localhost:9999".to_string()),
            false,
        );
        assert!(matches!(d.resolve_profile(), Err(AppError::Cli(_))));
    }

    #[test]
    fn test_missing_profile() {
        let d = Dispatcher::new(
            create_test_config(),
            None,
            Some("production".to_string()),
            None,
            false,
        );
        assert!(matches!(
            d.resolve_profile(),
            Err(AppError::Cli(CliError::ProfileNotFound { .. }))
        ));

        let fallback = Dispatcher::new(Config::default(), None, None, None, false);
        assert_eq!(
            fallback.resolve_profile().expect("built-in default").server_url,
            crate::api::client::DEFAULT_SERVER_URL
        );
    }

    #[tokio::test]
    async fn test_dispatch_config_commands() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = Config::file_in(temp_dir.path());
        let d = Dispatcher::new(
            create_test_config(),
            Some(config_path.clone()),
            None,
            None,
            false,
        );

        let result = d
            .dispatch(Commands::Config {
                command: ConfigCommands::Show,
            })
            .await;
        assert!(result.is_ok());

        let result = d
            .dispatch(Commands::Config {
                command: ConfigCommands::Set {
                    key: "timeout-seconds".to_string(),
                    value: "45".to_string(),
                },
            })
            .await;
        assert!(result.is_ok());

        let saved = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(
            saved.get_profile("test").and_then(|p| p.timeout_seconds),
            Some(45)
        );
    }
}
