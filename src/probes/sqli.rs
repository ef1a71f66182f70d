use tracing::{debug, warn};

use super::build_variants;
use crate::http::{PageFetcher, ScanControl};
use crate::models::Finding;

pub struct SqlInjectionProbe;

impl SqlInjectionProbe {
    pub const PAYLOADS: &'static [&'static str] =
        &["'", "1' OR '1'='1", "' OR 1=1--", "' UNION SELECT NULL--"];

    /// Database names and keywords that leak through unhandled query errors.
    /// Matching is a substring test on the lowercased body, so pages that
    /// merely talk about SQL are reported too.
    pub const ERROR_MARKERS: &'static [&'static str] =
        &["sql", "mysql", "sqlite", "postgresql", "oracle"];

    pub async fn run(fetcher: &dyn PageFetcher, control: &ScanControl, url: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for variant in build_variants(url, Self::PAYLOADS, str::to_string) {
            let response = match fetcher.fetch(&variant.url, control).await {
                Ok(response) => response,
                Err(e) if e.is_cancelled() => break,
                Err(e) => {
                    warn!(url, parameter = %variant.parameter, error = %e, "error testing SQL injection");
                    continue;
                }
            };

            if Self::has_error_marker(&response.body) {
                debug!(url, parameter = %variant.parameter, payload = variant.payload, "SQL error marker in response");
                findings.push(Finding::sql_injection(url, variant.parameter, variant.payload));
            }
        }

        findings
    }

    pub fn has_error_marker(body: &str) -> bool {
        let lower = body.to_lowercase();
        Self::ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
    }
}
