use crate::api::models::{AskRequest, AskResponse, HealthStatus};
use crate::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// The remote service that answers portal questions.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse>;
}

pub struct HttpAnswerService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerService {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    PortalError::Config(format!("Invalid authorization header: {}", e))
                })?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PortalError::Config(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PortalError::RemoteCallFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        Ok(response.json::<HealthStatus>().await?)
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let url = format!("{}/ask", self.base_url);
        debug!(url = %url, portal = ?request.portal_id, "posting question");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        debug!(status = %status, "answer service responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortalError::RemoteCallFailed(format!(
                "HTTP status {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str::<AskResponse>(&body)
            .map_err(|e| PortalError::RemoteCallFailed(format!("Malformed answer: {}", e)))
    }
}

/// Strip trailing slashes and a trailing `/ask` from an endpoint.
pub fn normalize_base_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/ask")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}
