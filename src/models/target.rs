use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::crawler::normalize;
use crate::error::ConfigError;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("webprobe/", env!("CARGO_PKG_VERSION"));

/// The site under test. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    base_url: String,
    normalized_base: String,
    max_depth: usize,
}

impl ScanTarget {
    pub fn new(base_url: impl Into<String>, max_depth: usize) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingHost(base_url));
        }

        let normalized_base = normalize(&base_url);

        Ok(Self {
            base_url,
            normalized_base,
            max_depth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn normalized_base(&self) -> &str {
        &self.normalized_base
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Same-origin check on an already normalized URL.
    pub fn in_scope(&self, normalized: &str) -> bool {
        normalized.starts_with(&self.normalized_base)
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target: ScanTarget,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub max_time: Option<Duration>,
    pub user_agent: String,
}

impl ScanConfig {
    pub fn new(target: ScanTarget) -> Self {
        Self {
            target,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            max_time: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_time(mut self, max_time: Option<Duration>) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
