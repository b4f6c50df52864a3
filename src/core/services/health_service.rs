use crate::api::client::LoanApiClient;
use crate::api::models::HealthCheck;
use crate::core::services::traits::HealthOperations;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

pub struct HealthService {
    client: Arc<LoanApiClient>,
}

impl HealthService {
    pub fn new(client: Arc<LoanApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthOperations for HealthService {
    async fn check(&self) -> Result<HealthCheck, ApiError> {
        let endpoint = "/health";
        let request = self.client.build_request(Method::GET, endpoint);
        self.client.execute(request, endpoint).await
    }
}
