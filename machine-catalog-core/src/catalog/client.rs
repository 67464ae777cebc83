use crate::error::CatalogError;
use lazy_static::lazy_static;
use log::debug;
use std::sync::Mutex;
use time::OffsetDateTime;

const USER_AGENT: &str = "machine-catalog-core/0.1";
const ACCEPT: &str = "application/json";
const MAX_API_HISTORY: usize = 100;

/// The fixed local endpoint the shipped binary talks to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ApiCall {
    pub url: String,
    pub timestamp: OffsetDateTime,
    pub status_code: u16,
    pub success: bool,
}

lazy_static! {
    static ref API_CALL_HISTORY: Mutex<Vec<ApiCall>> = Mutex::new(Vec::new());
}

fn record_api_call(call: ApiCall) {
    if let Ok(mut history) = API_CALL_HISTORY.lock() {
        history.push(call);
        // Keep only the last MAX_API_HISTORY calls to prevent memory issues
        if history.len() > MAX_API_HISTORY {
            let excess = history.len() - MAX_API_HISTORY;
            history.drain(0..excess);
        }
    }
}

#[derive(Debug)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client against an explicit base URL. Tests use this to point
    /// the client at a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(CatalogClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn call(&self, uri: &str) -> Result<reqwest::Response, CatalogError> {
        debug!("calling catalog API: {}", uri);

        let timestamp = OffsetDateTime::now_utc();
        match self.client.get(uri).send().await {
            Ok(response) => {
                record_api_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: response.status().as_u16(),
                    success: response.status().is_success(),
                });

                Ok(response)
            }
            Err(e) => {
                record_api_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: 0, // Unknown status for network errors
                    success: false,
                });

                Err(CatalogError::Network(e))
            }
        }
    }

    /// Get the API call history for debugging purposes
    pub fn api_call_history() -> Vec<ApiCall> {
        API_CALL_HISTORY
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Clear the API call history
    pub fn clear_api_call_history() {
        if let Ok(mut history) = API_CALL_HISTORY.lock() {
            history.clear();
        }
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new().expect("Failed to create CatalogClient")
    }
}
