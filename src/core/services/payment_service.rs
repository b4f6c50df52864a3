use crate::api::client::LoanApiClient;
use crate::api::models::{CreatePayment, Payment, PaymentSummary};
use crate::core::services::traits::PaymentOperations;
use crate::error::ApiError;
use crate::utils::validation::check_path_id;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

pub struct PaymentService {
    client: Arc<LoanApiClient>,
}

impl PaymentService {
    pub fn new(client: Arc<LoanApiClient>) -> Self {
        Self { client }
    }

    fn payments_path(&self, loan_id: &str) -> Result<String, ApiError> {
        check_path_id("loan id", loan_id)
            .map_err(|message| self.client.normalizer().invalid_argument(message))?;
        Ok(format!("/loans/{}/payments", loan_id))
    }
}

#[async_trait]
impl PaymentOperations for PaymentService {
    async fn make_payment(
        &self,
        loan_id: &str,
        payment: &CreatePayment,
    ) -> Result<Payment, ApiError> {
        let endpoint = self.payments_path(loan_id)?;
        let request = self
            .client
            .build_request(Method::POST, &endpoint)
            .json(payment);

        let created: Payment = self.client.execute(request, &endpoint).await?;
        log::info!(
            "payment {} recorded for loan {} ({})",
            created.id,
            created.loan_id,
            created.status
        );
        Ok(created)
    }

    async fn list_payments(&self, loan_id: &str) -> Result<Vec<Payment>, ApiError> {
        let endpoint = self.payments_path(loan_id)?;
        let request = self.client.build_request(Method::GET, &endpoint);
        self.client.execute(request, &endpoint).await
    }

    async fn get_payment(&self, loan_id: &str, payment_id: &str) -> Result<Payment, ApiError> {
        check_path_id("payment id", payment_id)
            .map_err(|message| self.client.normalizer().invalid_argument(message))?;
        let endpoint = format!("{}/{}", self.payments_path(loan_id)?, payment_id);
        let request = self.client.build_request(Method::GET, &endpoint);
        self.client.execute(request, &endpoint).await
    }

    async fn summary(&self, loan_id: &str) -> Result<PaymentSummary, ApiError> {
        let endpoint = format!("{}/summary", self.payments_path(loan_id)?);
        let request = self.client.build_request(Method::GET, &endpoint);
        self.client.execute(request, &endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ClientConfig;
    use crate::api::normalizer::CODE_INVALID_ARGUMENT;

    fn create_test_service() -> PaymentService {
        let client = LoanApiClient::new(ClientConfig::for_server("http://test.example")).unwrap();
        PaymentService::new(Arc::new(client))
    }

    #[test]
    fn test_payments_path() {
        let service = create_test_service();
        assert_eq!(
            service.payments_path("loan-1").unwrap(),
            "/loans/loan-1/payments"
        );
    }

    #[tokio::test]
    async fn test_get_payment_validates_both_ids() {
        let service = create_test_service();

        let err = service.get_payment("", "pay-1").await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some(CODE_INVALID_ARGUMENT));
        assert!(err.message.contains("loan id"));

        let err = service.get_payment("loan-1", "").await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some(CODE_INVALID_ARGUMENT));
        assert!(err.message.contains("payment id"));
    }
}
