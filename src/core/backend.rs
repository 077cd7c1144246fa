use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::models::{ProcessVideoRequest, ProcessVideoResponse};

/// The shell never waits out a download itself; timing belongs to the
/// backend. Only the health probe gets a short local deadline.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid backend address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    #[error("Network IO failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned error status: {0}")]
    HttpStatus(u16),

    #[error("Health check timed out")]
    HealthTimeout,
}

/// HTTP client for the note-generation backend. The backend is an
/// opaque collaborator: this client only moves JSON across the wire
/// and hands wire shapes back to the command layer.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("audio2note/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// POST /api/process/video. The backend reports download failures
    /// as JSON bodies on non-2xx statuses, so a parseable body always
    /// wins over the status code.
    pub async fn process_video(
        &self,
        request: &ProcessVideoRequest,
    ) -> Result<ProcessVideoResponse, BackendError> {
        let endpoint = self.base_url.join("api/process/video")?;
        debug!("Submitting video to backend: {}", request.url);

        let response = self.http.post(endpoint).json(request).send().await?;
        let status = response.status();

        match response.json::<ProcessVideoResponse>().await {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(BackendError::HttpStatus(status.as_u16())),
            Err(e) => Err(BackendError::Network(e)),
        }
    }

    /// GET /health with a short deadline. Returns whatever status
    /// document the backend publishes.
    pub async fn health(&self) -> Result<serde_json::Value, BackendError> {
        let endpoint = self.base_url.join("health")?;

        let response = timeout(HEALTH_TIMEOUT, self.http.get(endpoint).send())
            .await
            .map_err(|_| BackendError::HealthTimeout)??;

        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_is_accepted() {
        assert!(BackendClient::new(DEFAULT_BACKEND_URL).is_ok());
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        assert!(matches!(
            BackendClient::new("not a url"),
            Err(BackendError::InvalidAddress(_))
        ));
    }

    #[test]
    fn endpoints_join_onto_the_base() {
        let base = Url::parse(DEFAULT_BACKEND_URL).unwrap();
        assert_eq!(
            base.join("api/process/video").unwrap().as_str(),
            "http://localhost:8001/api/process/video"
        );
        assert_eq!(base.join("health").unwrap().as_str(), "http://localhost:8001/health");
    }
}
