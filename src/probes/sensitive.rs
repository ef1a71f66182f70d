use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::http::{PageFetcher, ScanControl};
use crate::models::{Finding, InfoType};

const EMAIL: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";
const PHONE: &str = r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b";
const SSN: &str = r"\b\d{3}-\d{2}-\d{4}\b";
// No backreferences in `regex`, so each quote style is spelled out.
const API_KEY: &str = concat!(
    r#"api[_-]?key[_-]?(?:'[a-zA-Z0-9]{32,45}'|"[a-zA-Z0-9]{32,45}""#,
    r"|\|[a-zA-Z0-9]{32,45}\||`[a-zA-Z0-9]{32,45}`)"
);

static PATTERNS: LazyLock<Vec<(InfoType, &'static str, Regex)>> = LazyLock::new(|| {
    [
        (InfoType::Email, EMAIL),
        (InfoType::Phone, PHONE),
        (InfoType::Ssn, SSN),
        (InfoType::ApiKey, API_KEY),
    ]
    .into_iter()
    .map(|(info, source)| (info, source, Regex::new(source).expect("static pattern")))
    .collect()
});

/// Passive check: one unmodified GET, then every pattern over the body.
pub struct SensitiveInfoProbe;

impl SensitiveInfoProbe {
    pub async fn run(fetcher: &dyn PageFetcher, control: &ScanControl, url: &str) -> Vec<Finding> {
        match fetcher.fetch(url, control).await {
            Ok(response) => Self::scan_body(url, &response.body),
            Err(e) if e.is_cancelled() => Vec::new(),
            Err(e) => {
                warn!(url, error = %e, "error checking sensitive information");
                Vec::new()
            }
        }
    }

    /// One finding per non-overlapping match of each pattern, in pattern order.
    pub fn scan_body(url: &str, body: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (info_type, source, regex) in PATTERNS.iter() {
            for m in regex.find_iter(body) {
                findings.push(Finding::sensitive_info(url, *info_type, *source, m.as_str()));
            }
        }

        if !findings.is_empty() {
            debug!(url, count = findings.len(), "sensitive data patterns matched");
        }
        findings
    }
}
