//! Client library for the loan-checkout REST service.
//!
//! Layers (dependency flow: CLI → Core → API):
//! - [`api`]: transport client, wire models and error normalization
//! - [`core`]: resource operations and view state
//! - [`storage`]: profile configuration for the command-line front end

pub use error::{ApiError, AppError};

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Resource operations and view state
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod api; // Loan service API client
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;

/// Types most callers need.
pub mod prelude {
    pub use crate::api::client::{ClientConfig, LoanApiClient};
    pub use crate::api::models::*;
    pub use crate::api::normalizer::{ErrorNormalizer, FailureCategory, FailureObserver};
    pub use crate::core::services::{
        HealthOperations, HealthService, LoanOperations, LoanService, PaymentOperations,
        PaymentService,
    };
    pub use crate::core::views::{LoadState, LoanView, PaymentsView, ViewSnapshot};
    pub use crate::error::{ApiError, AppError};
}
