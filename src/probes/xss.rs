use tracing::{debug, warn};

use super::build_variants;
use crate::http::{PageFetcher, ScanControl};
use crate::models::Finding;

pub struct XssProbe;

impl XssProbe {
    // Sent through `urlencoding::encode`, which also escapes `/`.
    pub const PAYLOADS: &'static [&'static str] = &[
        "<script>alert('XSS')</script>",
        "<img src=x onerror=alert('XSS')>",
        "javascript:alert('XSS')",
    ];

    /// Sends each payload percent-encoded and reports it when the decoded
    /// form comes back verbatim in the body.
    pub async fn run(fetcher: &dyn PageFetcher, control: &ScanControl, url: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        let variants = build_variants(url, Self::PAYLOADS, |payload| {
            urlencoding::encode(payload).into_owned()
        });

        for variant in variants {
            let response = match fetcher.fetch(&variant.url, control).await {
                Ok(response) => response,
                Err(e) if e.is_cancelled() => break,
                Err(e) => {
                    warn!(url, parameter = %variant.parameter, error = %e, "error testing XSS");
                    continue;
                }
            };

            if response.body.contains(variant.payload) {
                debug!(url, parameter = %variant.parameter, payload = variant.payload, "payload reflected");
                findings.push(Finding::xss(url, variant.parameter, variant.payload));
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingKind;
    use crate::probes::testing::FnFetcher;
    use url::Url;

    fn echo_param(url: &str, name: &str) -> String {
        Url::parse(url)
            .ok()
            .and_then(|u| {
                u.query_pairs()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.into_owned())
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_reflected_parameter_detected() {
        let fetcher = FnFetcher::new(|url: &str| {
            Some(format!("<p>Results for {}</p>", echo_param(url, "q")))
        });
        let control = ScanControl::new();

        let findings = XssProbe::run(&fetcher, &control, "http://site/search?q=test").await;

        assert_eq!(findings.len(), XssProbe::PAYLOADS.len());
        assert!(findings.iter().all(|f| f.kind == FindingKind::Xss));
        assert!(findings.iter().all(|f| f.parameter() == Some("q")));
        assert_eq!(findings[0].payload, "<script>alert('XSS')</script>");
    }

    #[tokio::test]
    async fn test_only_reflected_payloads_reported() {
        // Strips angle brackets, so only the javascript: URI survives intact.
        let fetcher = FnFetcher::new(|url: &str| {
            Some(echo_param(url, "q").replace(['<', '>'], ""))
        });
        let control = ScanControl::new();

        let findings = XssProbe::run(&fetcher, &control, "http://site/search?q=test").await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].payload, "javascript:alert('XSS')");
    }

    #[tokio::test]
    async fn test_payload_is_sent_encoded() {
        let fetcher = FnFetcher::new(|_: &str| Some(String::new()));
        let control = ScanControl::new();

        XssProbe::run(&fetcher, &control, "http://site/search?q=test").await;

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("http://site/search?q=%3Cscript%3E"));
        assert!(requests.iter().all(|r| !r.contains('<')));
    }

    #[tokio::test]
    async fn test_failed_variant_skipped_and_rest_still_reported() {
        let fetcher = FnFetcher::new(|url: &str| {
            if url.contains("%3Cscript") {
                None
            } else {
                Some(echo_param(url, "q"))
            }
        });
        let control = ScanControl::new();

        let findings = XssProbe::run(&fetcher, &control, "http://site/search?q=test").await;

        assert_eq!(fetcher.request_count(), 3);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].payload, "<img src=x onerror=alert('XSS')>");
        assert_eq!(findings[1].payload, "javascript:alert('XSS')");
    }

    #[tokio::test]
    async fn test_no_query_params_no_findings() {
        let fetcher = FnFetcher::new(|_: &str| Some("<script>alert('XSS')</script>".to_string()));
        let control = ScanControl::new();

        let findings = XssProbe::run(&fetcher, &control, "http://site/static.html").await;

        assert!(findings.is_empty());
        assert_eq!(fetcher.request_count(), 0);
    }
}
