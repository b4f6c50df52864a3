use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when neither the server nor the transport said anything useful.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
}

/// The single error shape every failed API operation resolves to.
///
/// `status` is the HTTP status of the response, or 0 when no response was
/// received (timeout, DNS failure, refused connection, request never sent).
/// `message` is never empty.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Build an error, substituting the fallback message for an empty one.
    pub fn new(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            status,
            message,
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// True when the request never produced an HTTP response.
    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Profile '{profile}' not found")]
    ProfileNotFound { profile: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration serialization failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Api(api_error) => match api_error.status {
                0 => ErrorSeverity::High,
                401 | 403 => ErrorSeverity::High,
                status if status >= 500 => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(api_error) => match &api_error.code {
                Some(code) => format!("{} [{}]", api_error.message, code),
                None => api_error.message.clone(),
            },
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(api_error) => match api_error.status {
                0 if api_error.code.as_deref() == Some("ERR_INVALID_ARGUMENT") => None,
                0 => Some(
                    "Check that the loan service is reachable (see 'config show' for the server URL)"
                        .to_string(),
                ),
                401 | 403 => Some("The server refused the request for this account".to_string()),
                404 => Some("'loan-checkout loan list' to see the available loans".to_string()),
                status if status >= 500 => {
                    Some("The loan service failed; try again later".to_string())
                }
                _ => None,
            },
            AppError::Config(_) => Some(
                "'loan-checkout config set <key> <value>' to fix the configuration".to_string(),
            ),
            AppError::Cli(CliError::ProfileNotFound { .. }) => {
                Some("'loan-checkout config show' to list the configured profiles".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_empty_message_falls_back() {
        let err = ApiError::new(500, "", None);
        assert_eq!(err.message, FALLBACK_ERROR_MESSAGE);

        let err = ApiError::new(500, "   ", None);
        assert_eq!(err.message, FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(404, "Loan not found", Some("LOAN_NOT_FOUND".to_string()));
        assert_eq!(format!("{}", err), "Loan not found (status 404)");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(!err.is_network());
    }

    #[test]
    fn test_api_error_serializes_without_absent_fields() {
        let err = ApiError::new(0, "timeout of 15000ms exceeded", None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], 0);
        assert!(json.get("code").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_app_error_display_api() {
        let app_err = AppError::Api(ApiError::new(400, "bad amount", None));
        assert_eq!(
            format!("{}", app_err),
            "ApiError: bad amount (status 400)"
        );
    }

    #[test]
    fn test_severity_by_status() {
        let severity = |status| AppError::Api(ApiError::new(status, "x", None)).severity();
        assert_eq!(severity(0), ErrorSeverity::High);
        assert_eq!(severity(401), ErrorSeverity::High);
        assert_eq!(severity(403), ErrorSeverity::High);
        assert_eq!(severity(422), ErrorSeverity::Medium);
        assert_eq!(severity(503), ErrorSeverity::Critical);
    }

    #[test]
    fn test_display_friendly_includes_code() {
        let app_err = AppError::Api(ApiError::new(
            409,
            "Loan already paid off",
            Some("LOAN_CLOSED".to_string()),
        ));
        assert_eq!(app_err.display_friendly(), "Loan already paid off [LOAN_CLOSED]");
    }

    #[test]
    fn test_troubleshooting_hints() {
        let network = AppError::Api(ApiError::new(0, "connection refused", None));
        assert!(network.troubleshooting_hint().is_some());

        let invalid = AppError::Api(ApiError::new(
            0,
            "loan id must not be empty",
            Some("ERR_INVALID_ARGUMENT".to_string()),
        ));
        assert!(invalid.troubleshooting_hint().is_none());

        let conflict = AppError::Api(ApiError::new(409, "conflict", None));
        assert!(conflict.troubleshooting_hint().is_none());

        let config = AppError::Config(ConfigError::UnknownKey {
            key: "colour".to_string(),
        });
        assert!(config.troubleshooting_hint().is_some());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::ConfigParseError {
            message: "expected `=`".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Configuration parse error: expected `=`"
        );
    }

    #[test]
    fn test_invalid_config_value_display_includes_reason() {
        let err = ConfigError::InvalidValue {
            field: "timeout-seconds".to_string(),
            value: "0".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid configuration value for 'timeout-seconds': 0 (timeout must be greater than zero)"
        );
    }
}
