//! HTTP access behind a trait so retrieval can be exercised without a network

use crate::config::PipelineConfig;
use crate::error::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;

/// Raw response: status code plus the complete body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of HTTP GET responses
#[async_trait::async_trait]
pub trait HttpSource: Send + Sync {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// transport failures are errors.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse>;

    /// Fetch `url` as text, failing on non-success statuses
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self.get(url, timeout).await?;
        if !response.is_success() {
            return Err(HarvestError::Http {
                status: response.status,
                message: format!("GET {} failed", url),
            });
        }
        Ok(String::from_utf8_lossy(&response.body).into_owned())
    }
}

/// [`HttpSource`] backed by a shared `reqwest` client
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    /// Build a client using the configured user agent
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.network.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| HarvestError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpSource for ReqwestSource {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
