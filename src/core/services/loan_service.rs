use crate::api::client::LoanApiClient;
use crate::api::models::{LoanApplication, LoanDetail, LoanResult, LoanStatus, UpdateLoan};
use crate::core::services::traits::LoanOperations;
use crate::error::ApiError;
use crate::utils::validation::check_path_id;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

pub struct LoanService {
    client: Arc<LoanApiClient>,
}

impl LoanService {
    pub fn new(client: Arc<LoanApiClient>) -> Self {
        Self { client }
    }

    fn loan_path(&self, loan_id: &str) -> Result<String, ApiError> {
        check_path_id("loan id", loan_id)
            .map_err(|message| self.client.normalizer().invalid_argument(message))?;
        Ok(format!("/loans/{}", loan_id))
    }
}

#[async_trait]
impl LoanOperations for LoanService {
    async fn apply(&self, application: &LoanApplication) -> Result<LoanResult, ApiError> {
        let endpoint = "/loans/apply";
        let request = self
            .client
            .build_request(Method::POST, endpoint)
            .json(application);

        let result: LoanResult = self.client.execute(request, endpoint).await?;
        match &result {
            LoanResult::Approved { loan_id, .. } => {
                log::info!("loan application approved as {}", loan_id)
            }
            LoanResult::Rejected { reason } => {
                log::info!("loan application rejected: {}", reason)
            }
        }
        Ok(result)
    }

    async fn list(&self, status: Option<LoanStatus>) -> Result<Vec<LoanDetail>, ApiError> {
        let endpoint = "/loans";
        let mut request = self.client.build_request(Method::GET, endpoint);
        if let Some(status) = status {
            request = request.query(&[("status", status.to_string())]);
        }

        self.client.execute(request, endpoint).await
    }

    async fn get(&self, loan_id: &str) -> Result<LoanDetail, ApiError> {
        let endpoint = self.loan_path(loan_id)?;
        let request = self.client.build_request(Method::GET, &endpoint);
        self.client.execute(request, &endpoint).await
    }

    async fn update(&self, loan_id: &str, patch: &UpdateLoan) -> Result<LoanDetail, ApiError> {
        let endpoint = self.loan_path(loan_id)?;
        let request = self
            .client
            .build_request(Method::PUT, &endpoint)
            .json(patch);
        self.client.execute(request, &endpoint).await
    }

    async fn delete(&self, loan_id: &str) -> Result<(), ApiError> {
        let endpoint = self.loan_path(loan_id)?;
        let request = self.client.build_request(Method::DELETE, &endpoint);
        self.client.execute_empty(request, &endpoint).await
    }
}
