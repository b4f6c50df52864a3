use crate::api::models::{
    CreatePayment, HealthCheck, LoanApplication, LoanDetail, LoanResult, LoanStatus, Payment,
    PaymentSummary, UpdateLoan,
};
use crate::error::ApiError;
use async_trait::async_trait;

/// Loan operations; implemented over HTTP by `LoanService`.
#[async_trait]
pub trait LoanOperations: Send + Sync {
    /// Submit a new application
    async fn apply(&self, application: &LoanApplication) -> Result<LoanResult, ApiError>;

    /// List loans, optionally restricted to one status
    async fn list(&self, status: Option<LoanStatus>) -> Result<Vec<LoanDetail>, ApiError>;

    /// Get a single loan by ID
    async fn get(&self, loan_id: &str) -> Result<LoanDetail, ApiError>;

    /// Apply a partial update and return the server-confirmed loan
    async fn update(&self, loan_id: &str, patch: &UpdateLoan) -> Result<LoanDetail, ApiError>;

    /// Delete (cancel) a loan
    async fn delete(&self, loan_id: &str) -> Result<(), ApiError>;
}

/// Payment operations scoped to one loan; implemented by `PaymentService`.
#[async_trait]
pub trait PaymentOperations: Send + Sync {
    async fn make_payment(
        &self,
        loan_id: &str,
        payment: &CreatePayment,
    ) -> Result<Payment, ApiError>;

    async fn list_payments(&self, loan_id: &str) -> Result<Vec<Payment>, ApiError>;

    async fn get_payment(&self, loan_id: &str, payment_id: &str) -> Result<Payment, ApiError>;

    async fn summary(&self, loan_id: &str) -> Result<PaymentSummary, ApiError>;
}

#[async_trait]
pub trait HealthOperations: Send + Sync {
    async fn check(&self) -> Result<HealthCheck, ApiError>;
}
