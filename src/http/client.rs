use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use super::ScanControl;
use crate::error::{ConfigError, FetchError};
use crate::models::{ResponseInfo, ScanConfig};

/// Anything able to GET a URL for the crawler and probes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, control: &ScanControl) -> Result<ResponseInfo, FetchError>;
}

/// Session-scoped HTTP client. Cookies persist for the whole scan.
///
/// **TLS certificate validation is disabled.** Scan targets are usually test
/// hosts with self-signed certificates; do not reuse this client for anything
/// that needs authenticated transport.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self, ConfigError> {
        Self::new(config.timeout_secs, &config.user_agent)
    }

    async fn execute_request(&self, url: &str, start: Instant) -> Result<ResponseInfo, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let mut info = ResponseInfo::new(url, status, body, duration_ms);
        info.headers = headers;
        Ok(info)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str, control: &ScanControl) -> Result<ResponseInfo, FetchError> {
        if control.is_cancelled() {
            return Err(FetchError::Cancelled(url.to_string()));
        }

        let start = Instant::now();
        let result = tokio::select! {
            result = self.execute_request(url, start) => result,
            _ = control.cancelled() => Err(FetchError::Cancelled(url.to_string())),
        };

        match &result {
            Ok(info) => debug!(url, status = info.status, size = info.size, "fetched"),
            Err(e) => debug!(url, error = %e, "fetch failed"),
        }
        result
    }
}
