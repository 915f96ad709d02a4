use crate::error::{Result, ScoreError};
use crate::types::config::RetrievalConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Source of raw page markup for a source id.
pub trait Retrieve: Send + Sync {
    fn fetch(&self, source_id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches pages over HTTP with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: reqwest::Client,
}

impl HttpRetriever {
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| ScoreError::Retrieval {
                source_id: "<client>".to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Retrieve for HttpRetriever {
    async fn fetch(&self, source_id: &str) -> Result<String> {
        let failed = |err: reqwest::Error| {
            let reason = if err.is_timeout() {
                "timed out".to_string()
            } else {
                err.to_string()
            };
            warn!(source = source_id, %reason, "page retrieval failed");
            ScoreError::Retrieval {
                source_id: source_id.to_string(),
                reason,
            }
        };

        let response = self
            .client
            .get(source_id)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?;
        let body = response.text().await.map_err(failed)?;
        info!(source = source_id, bytes = body.len(), "page retrieved");
        Ok(body)
    }
}
