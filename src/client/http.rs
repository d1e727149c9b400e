use std::time::Duration;

use reqwest::Client;

use super::error::ClientError;
use super::types::StatusRequest;
use crate::config::WatchConfig;
use crate::watcher::JobId;

/// Anything that can fetch the raw status body for a job.
///
/// The watcher only depends on this trait, so tests can script responses
/// without a server.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

impl<T: StatusSource> StatusSource for std::sync::Arc<T> {
    fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<String, ClientError>> + Send {
        (**self).fetch_status(job_id)
    }
}

/// HTTP client for the fixed status-check endpoint.
pub struct StatusClient {
    client: Client,
    endpoint: String,
}

impl StatusClient {
    /// Build a client from the endpoint and timeouts in `config`.
    pub fn from_config(config: &WatchConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Create a client pointing at an arbitrary endpoint with default timeouts.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let config = WatchConfig {
            endpoint: endpoint.into(),
            ..WatchConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl StatusSource for StatusClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&StatusRequest {
                job_id: job_id.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}
