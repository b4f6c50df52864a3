//! Failure normalization for every exchange issued through [`LoanApiClient`].
//!
//! Whatever went wrong (no response, an error status, an unreadable body)
//! comes out as one [`ApiError`]. Responses with status 401, 403 and 5xx are
//! also reported to a [`FailureObserver`] exactly once per failed call.
//!
//! [`LoanApiClient`]: crate::api::client::LoanApiClient

use crate::error::{ApiError, FALLBACK_ERROR_MESSAGE};
use serde_json::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

pub const CODE_TIMEOUT: &str = "ETIMEDOUT";
pub const CODE_NETWORK: &str = "ERR_NETWORK";
pub const CODE_BAD_REQUEST: &str = "ERR_BAD_REQUEST";
pub const CODE_BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";
pub const CODE_PARSE: &str = "ERR_PARSE";
pub const CODE_INVALID_ARGUMENT: &str = "ERR_INVALID_ARGUMENT";
pub const CODE_CLIENT_INIT: &str = "ERR_CLIENT_INIT";

/// Observability categories for failed responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Unauthorized,
    Forbidden,
    ServerError,
}

impl FailureCategory {
    pub fn classify(status: u16) -> Option<Self> {
        match status {
            401 => Some(FailureCategory::Unauthorized),
            403 => Some(FailureCategory::Forbidden),
            s if s >= 500 => Some(FailureCategory::ServerError),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::Unauthorized => "unauthorized",
            FailureCategory::Forbidden => "forbidden",
            FailureCategory::ServerError => "server error",
        }
    }
}

/// Receives classified failures. Must not be relied on for control flow.
pub trait FailureObserver: Send + Sync {
    fn on_failure(&self, category: FailureCategory, endpoint: &str, error: &ApiError);
}

/// Default observer: writes each category through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl FailureObserver for LogObserver {
    fn on_failure(&self, category: FailureCategory, endpoint: &str, error: &ApiError) {
        match category {
            FailureCategory::Unauthorized | FailureCategory::Forbidden => log::warn!(
                "{} response from {}: {}",
                category.label(),
                endpoint,
                error.message
            ),
            FailureCategory::ServerError => log::error!(
                "{} ({}) from {}: {}",
                category.label(),
                error.status,
                endpoint,
                error.message
            ),
        }
    }
}

#[derive(Clone)]
pub struct ErrorNormalizer {
    observer: Arc<dyn FailureObserver>,
}

impl Default for ErrorNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(LogObserver))
    }
}

impl std::fmt::Debug for ErrorNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorNormalizer").finish_non_exhaustive()
    }
}

impl ErrorNormalizer {
    pub fn new(observer: Arc<dyn FailureObserver>) -> Self {
        Self { observer }
    }

    /// Normalize a response that arrived with a non-success status.
    pub fn from_response(&self, status: u16, body: &[u8], endpoint: &str) -> ApiError {
        let payload = serde_json::from_slice::<Value>(body).ok();
        let fields = payload.as_ref().and_then(Value::as_object);

        let message = fields
            .and_then(|f| f.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(FALLBACK_ERROR_MESSAGE);

        let code = fields
            .and_then(|f| f.get("code"))
            .and_then(|c| match c {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| status_code_label(status).to_string());

        let details = fields
            .and_then(|f| f.get("details"))
            .filter(|d| !d.is_null())
            .cloned();

        let error = ApiError::new(status, message, Some(code)).with_details(details);
        self.report(endpoint, &error);
        error
    }

    /// Normalize a transport failure. `status` is set when the failure
    /// happened after the response head arrived (e.g. reading the body).
    pub fn from_transport(
        &self,
        error: &reqwest::Error,
        status: Option<u16>,
        timeout: Duration,
        endpoint: &str,
    ) -> ApiError {
        let (message, code) = if error.is_timeout() {
            (
                format!("timeout of {}ms exceeded", timeout.as_millis()),
                CODE_TIMEOUT,
            )
        } else if status.is_some() {
            (error.to_string(), CODE_BAD_RESPONSE)
        } else {
            (error.to_string(), CODE_NETWORK)
        };

        let error = ApiError::new(status.unwrap_or(0), message, Some(code.to_string()));
        self.report(endpoint, &error);
        error
    }

    /// Normalize a success response whose body could not be decoded.
    pub fn from_malformed_success(
        &self,
        status: u16,
        error: &serde_json::Error,
        endpoint: &str,
    ) -> ApiError {
        ApiError::new(
            status,
            format!("Failed to parse response from {}: {}", endpoint, error),
            Some(CODE_PARSE.to_string()),
        )
    }

    /// Reject a call before it reaches the network.
    pub fn invalid_argument(&self, message: impl Into<String>) -> ApiError {
        ApiError::new(0, message, Some(CODE_INVALID_ARGUMENT.to_string()))
    }

    fn report(&self, endpoint: &str, error: &ApiError) {
        let Some(category) = FailureCategory::classify(error.status) else {
            return;
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.observer.on_failure(category, endpoint, error)
        }));
        if outcome.is_err() {
            log::debug!("failure observer panicked while reporting {}", endpoint);
        }
    }
}

fn status_code_label(status: u16) -> &'static str {
    if status >= 500 {
        CODE_BAD_RESPONSE
    } else {
        CODE_BAD_REQUEST
    }
}
