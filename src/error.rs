use thiserror::Error;

/// Rejected scan settings. These are the only fatal errors; they are raised
/// before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("Base URL '{0}' has no host")]
    MissingHost(String),

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,

    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

/// Why a single request produced no data. Callers treat these as "nothing
/// learned from this page", never as scan-fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Could not read body of {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Scan cancelled before {0} completed")]
    Cancelled(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled(_))
    }
}
