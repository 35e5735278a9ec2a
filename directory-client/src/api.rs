//! HTTP client for the directory API.

use async_trait::async_trait;
use directory_core::{
    CompaniesResponse, CompanyPage, DataResponse, ErrorResponse, Facets, HealthResponse,
    QueryDescriptor, Stats,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced to a feed when a fetch fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiClientError {
    /// The request exceeded the transport deadline.
    Timeout { url: String },
    /// The request never produced an HTTP response.
    Transport { url: String, message: String },
    /// The server answered with an error status.
    Server {
        status: u16,
        message: String,
        error: String,
    },
    /// The response body was not the expected JSON.
    Decode { url: String, message: String },
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { url } => write!(f, "request to {} timed out", url),
            Self::Transport { url, message } => write!(f, "request to {} failed: {}", url, message),
            Self::Server {
                status,
                message,
                error,
            } => {
                if error.is_empty() {
                    write!(f, "{} (HTTP {})", message, status)
                } else {
                    write!(f, "{}: {} (HTTP {})", message, error, status)
                }
            }
            Self::Decode { url, message } => {
                write!(f, "unexpected response from {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for ApiClientError {}

/// The request/response boundary the state machine fetches through.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn fetch_companies(&self, query: &QueryDescriptor)
        -> Result<CompanyPage, ApiClientError>;

    async fn fetch_facets(&self) -> Result<Facets, ApiClientError>;

    async fn fetch_stats(&self) -> Result<Stats, ApiClientError>;

    async fn health(&self) -> Result<HealthResponse, ApiClientError>;
}

/// reqwest-backed [`DirectoryApi`].
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiClientError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API Request: GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        debug!("API Response: {} {}", status.as_u16(), url);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !status.is_success() {
            return Err(server_error(status.as_u16(), &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiClientError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> ApiClientError {
    if e.is_timeout() {
        ApiClientError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Prefer the server's error envelope; fall back to the raw body.
fn server_error(status: u16, body: &[u8]) -> ApiClientError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(envelope) => ApiClientError::Server {
            status,
            message: envelope.message,
            error: envelope.error,
        },
        Err(_) => ApiClientError::Server {
            status,
            message: "Request failed".to_string(),
            error: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

#[async_trait]
impl DirectoryApi for ApiClient {
    async fn fetch_companies(
        &self,
        query: &QueryDescriptor,
    ) -> Result<CompanyPage, ApiClientError> {
        let response: CompaniesResponse = self
            .get_json("/api/companies", &query.to_query_pairs())
            .await?;
        Ok(response.into())
    }

    async fn fetch_facets(&self) -> Result<Facets, ApiClientError> {
        let response: DataResponse<Facets> = self.get_json("/api/filters", &[]).await?;
        Ok(response.data)
    }

    async fn fetch_stats(&self) -> Result<Stats, ApiClientError> {
        let response: DataResponse<Stats> = self.get_json("/api/stats", &[]).await?;
        Ok(response.data)
    }

    async fn health(&self) -> Result<HealthResponse, ApiClientError> {
        self.get_json("/health", &[]).await
    }
}
