use crate::api::normalizer::{CODE_CLIENT_INIT, ErrorNormalizer, FailureObserver};
use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

pub const API_BASE_PATH: &str = "/api/v1";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const USER_AGENT: &str = concat!("loan-checkout/", env!("CARGO_PKG_VERSION"));

static SHARED_CLIENT: OnceLock<Arc<LoanApiClient>> = OnceLock::new();

/// Everything the transport needs, fixed at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server origin plus `/api/v1`, without a trailing slash.
    pub base_address: String,
    pub default_headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_server(DEFAULT_SERVER_URL)
    }
}

impl ClientConfig {
    pub fn for_server(server_url: &str) -> Self {
        let origin = server_url.trim_end_matches('/');
        let base_address = if origin.ends_with(API_BASE_PATH) {
            origin.to_string()
        } else {
            format!("{}{}", origin, API_BASE_PATH)
        };

        Self {
            base_address,
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    fn header_map(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| client_init_error(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                client_init_error(format!("Invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

/// Shared transport for every resource operation.
///
/// Holds no per-call state, so one instance is cloned or shared through
/// `Arc` across all services and tasks.
#[derive(Debug, Clone)]
pub struct LoanApiClient {
    client: Client,
    config: ClientConfig,
    normalizer: ErrorNormalizer,
}

impl LoanApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_normalizer(config, ErrorNormalizer::default())
    }

    pub fn with_observer(
        config: ClientConfig,
        observer: Arc<dyn FailureObserver>,
    ) -> Result<Self, ApiError> {
        Self::with_normalizer(config, ErrorNormalizer::new(observer))
    }

    fn with_normalizer(
        mut config: ClientConfig,
        normalizer: ErrorNormalizer,
    ) -> Result<Self, ApiError> {
        config.base_address = config.base_address.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(config.header_map()?)
            .build()
            .map_err(|e| client_init_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(LoanApiClient {
            client,
            config,
            normalizer,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_address(&self) -> &str {
        &self.config.base_address
    }

    pub fn normalizer(&self) -> &ErrorNormalizer {
        &self.normalizer
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_address, path);
        self.client.request(method, url)
    }

    /// Send `request` and decode a JSON success body into `T`.
    pub async fn execute<T>(&self, request: RequestBuilder, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let (status, body) = self.dispatch(request, endpoint).await?;
        serde_json::from_slice(&body)
            .map_err(|e| self.normalizer.from_malformed_success(status, &e, endpoint))
    }

    /// Send `request` and discard whatever success body comes back.
    pub async fn execute_empty(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<(), ApiError> {
        self.dispatch(request, endpoint).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<(u16, Vec<u8>), ApiError> {
        log::debug!("sending request to {}", endpoint);

        let response = request.send().await.map_err(|e| {
            self.normalizer
                .from_transport(&e, None, self.config.timeout, endpoint)
        })?;

        let status = response.status();
        log::debug!("{} answered {}", endpoint, status);

        if status.is_success() {
            let body = response.bytes().await.map_err(|e| {
                self.normalizer.from_transport(
                    &e,
                    Some(status.as_u16()),
                    self.config.timeout,
                    endpoint,
                )
            })?;
            Ok((status.as_u16(), body.to_vec()))
        } else {
            let body = response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .unwrap_or_default();
            Err(self.normalizer.from_response(status.as_u16(), &body, endpoint))
        }
    }
}

/// Install the process-wide client. Only the first call succeeds.
pub fn install_shared(client: LoanApiClient) -> Result<Arc<LoanApiClient>, ApiError> {
    let client = Arc::new(client);
    SHARED_CLIENT
        .set(Arc::clone(&client))
        .map_err(|_| client_init_error("A shared client is already installed"))?;
    Ok(client)
}

pub fn shared() -> Option<Arc<LoanApiClient>> {
    SHARED_CLIENT.get().cloned()
}

fn client_init_error(message: impl Into<String>) -> ApiError {
    ApiError::new(0, message, Some(CODE_CLIENT_INIT.to_string()))
}
