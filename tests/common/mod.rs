#![allow(dead_code)]

use loan_checkout::api::client::{ClientConfig, LoanApiClient};
use loan_checkout::api::normalizer::{FailureCategory, FailureObserver};
use loan_checkout::error::ApiError;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> Arc<LoanApiClient> {
    let client = LoanApiClient::new(ClientConfig::for_server(&server.uri()))
        .expect("client should build");
    Arc::new(client)
}

/// Records every failure the normalizer reports.
#[derive(Default)]
pub struct RecordingObserver {
    pub seen: Mutex<Vec<(FailureCategory, String, u16)>>,
}

impl FailureObserver for RecordingObserver {
    fn on_failure(&self, category: FailureCategory, endpoint: &str, error: &ApiError) {
        self.seen
            .lock()
            .unwrap()
            .push((category, endpoint.to_string(), error.status));
    }
}

pub fn observed_client(server: &MockServer) -> (Arc<LoanApiClient>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let config = ClientConfig::for_server(&server.uri());
    let client =
        LoanApiClient::with_observer(config, observer.clone()).expect("client should build");
    (Arc::new(client), observer)
}

pub fn loan_json(id: &str) -> Value {
    json!({
        "id": id,
        "amount": 10000.0,
        "termMonths": 12,
        "interestRate": 5.5,
        "status": "ACTIVE",
        "applicantName": "John Doe",
        "applicantEmail": "john@example.com",
        "employmentStatus": "EMPLOYED",
        "createdAt": "2024-01-15T10:00:00Z",
        "updatedAt": "2024-01-15T10:00:00Z"
    })
}

pub fn payment_json(id: &str, loan_id: &str) -> Value {
    json!({
        "id": id,
        "loanId": loan_id,
        "amount": 500.0,
        "method": "BANK_TRANSFER",
        "status": "COMPLETED",
        "processedAt": "2024-02-01T09:00:00Z"
    })
}
