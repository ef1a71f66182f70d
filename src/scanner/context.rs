use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::crawler::Crawler;
use crate::error::ConfigError;
use crate::http::{HttpClient, PageFetcher, ScanControl};
use crate::models::{
    CrawledPage, Finding, FindingsStore, ScanConfig, ScanReport, ScanTarget, VisitedSet,
};
use crate::probes::{SensitiveInfoProbe, SqlInjectionProbe, XssProbe};

/// Everything one scan owns: the session, the visited set and the finding
/// log. Separate contexts share nothing, so scans can run side by side.
pub struct ScanContext {
    target: ScanTarget,
    fetcher: Arc<dyn PageFetcher>,
    control: Arc<ScanControl>,
    visited: VisitedSet,
    findings: FindingsStore,
    semaphore: Arc<Semaphore>,
}

impl ScanContext {
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = HttpClient::from_config(config)?;
        Ok(Self::with_fetcher(
            config.target.clone(),
            Arc::new(client),
            Arc::new(ScanControl::with_time_limit(config.max_time)),
            config.concurrency,
        ))
    }

    pub fn with_fetcher(
        target: ScanTarget,
        fetcher: Arc<dyn PageFetcher>,
        control: Arc<ScanControl>,
        concurrency: usize,
    ) -> Self {
        Self {
            target,
            fetcher,
            control,
            visited: VisitedSet::new(),
            findings: FindingsStore::new(),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    /// Handle for aborting the scan from outside, e.g. on Ctrl-C.
    pub fn control(&self) -> Arc<ScanControl> {
        Arc::clone(&self.control)
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.findings.snapshot()
    }

    pub async fn crawl(&self, start_url: &str) -> Vec<CrawledPage> {
        self.crawler().crawl(start_url).await
    }

    pub async fn check_sql_injection(&self, url: &str) -> usize {
        let found = SqlInjectionProbe::run(self.fetcher.as_ref(), &self.control, url).await;
        self.record(found)
    }

    pub async fn check_xss(&self, url: &str) -> usize {
        let found = XssProbe::run(self.fetcher.as_ref(), &self.control, url).await;
        self.record(found)
    }

    pub async fn check_sensitive_info(&self, url: &str) -> usize {
        let found = SensitiveInfoProbe::run(self.fetcher.as_ref(), &self.control, url).await;
        self.record(found)
    }

    /// Runs the three probes on one page concurrently.
    pub async fn probe_page(&self, url: &str) -> usize {
        let (sqli, xss, sensitive) = tokio::join!(
            self.check_sql_injection(url),
            self.check_xss(url),
            self.check_sensitive_info(url),
        );
        sqli + xss + sensitive
    }

    /// Full scan: crawl from the base URL, then probe every visited page.
    pub async fn run(&self, show_progress: bool) -> ScanReport {
        let start = Instant::now();
        let scan_time = Utc::now().to_rfc3339();

        let spinner = self.create_spinner(show_progress);
        let pages = self
            .crawler()
            .crawl_with(self.target.base_url(), |page| {
                spinner.set_message(format!("crawling {}", page.url));
                spinner.tick();
            })
            .await;
        spinner.finish_and_clear();
        info!(pages = pages.len(), "crawl finished");

        let pb = self.create_progress_bar(pages.len(), show_progress);
        let futures: Vec<_> = pages
            .iter()
            .map(|page| self.probe_with_permit(&page.url, &pb))
            .collect();
        join_all(futures).await;
        pb.finish_with_message("Scan complete");

        let cancelled = self.control.is_cancelled();
        if cancelled {
            warn!("scan stopped early, report is partial");
        }

        ScanReport {
            target: self.target.base_url().to_string(),
            scan_time,
            max_depth: self.target.max_depth(),
            pages,
            findings: self.findings.snapshot(),
            duration_ms: start.elapsed().as_millis() as u64,
            cancelled,
        }
    }

    async fn probe_with_permit(&self, url: &str, pb: &ProgressBar) {
        let Ok(_permit) = self.semaphore.acquire().await else {
            return;
        };
        if !self.control.is_cancelled() {
            pb.set_message(url.to_string());
            self.probe_page(url).await;
        }
        pb.inc(1);
    }

    fn crawler(&self) -> Crawler<'_> {
        Crawler::new(
            self.fetcher.as_ref(),
            &self.target,
            &self.visited,
            &self.control,
        )
    }

    fn record(&self, found: Vec<Finding>) -> usize {
        let count = found.len();
        self.findings.extend(found);
        count
    }

    fn create_spinner(&self, show: bool) -> ProgressBar {
        if !show {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner
    }

    fn create_progress_bar(&self, total: usize, show: bool) -> ProgressBar {
        if !show {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingKind;
    use crate::probes::testing::FnFetcher;

    fn site(url: &str) -> Option<String> {
        let path = url.trim_start_matches("http://shop.local");
        if path == "/" {
            Some(r#"<a href="/item?id=1">item</a><a href="/contact">contact</a>"#.to_string())
        } else if path.starts_with("/item?id=") {
            if path.contains("'") {
                Some("You have an error in your SQL syntax".to_string())
            } else {
                Some("<p>item</p>".to_string())
            }
        } else if path == "/contact" {
            Some("mail sales@shop.local".to_string())
        } else {
            None
        }
    }

    fn context(fetcher: FnFetcher<fn(&str) -> Option<String>>, depth: usize) -> ScanContext {
        ScanContext::with_fetcher(
            ScanTarget::new("http://shop.local/", depth).unwrap(),
            Arc::new(fetcher),
            Arc::new(ScanControl::new()),
            4,
        )
    }

    #[tokio::test]
    async fn test_run_crawls_and_probes_every_page() {
        let ctx = context(FnFetcher::new(site as fn(&str) -> Option<String>), 2);

        let report = ctx.run(false).await;

        assert_eq!(report.pages.len(), 3);
        assert!(!report.cancelled);
        let sqli: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.kind == FindingKind::SqlInjection)
            .collect();
        assert_eq!(sqli.len(), SqlInjectionProbe::PAYLOADS.len());
        assert!(sqli.iter().all(|f| f.parameter() == Some("id")));
        assert_eq!(
            report
                .findings
                .iter()
                .filter(|f| f.kind == FindingKind::SensitiveInfo)
                .count(),
            1
        );
        assert_eq!(report.summary().pages_crawled, 3);
    }

    #[tokio::test]
    async fn test_probe_operations_append_to_store() {
        let ctx = context(FnFetcher::new(site as fn(&str) -> Option<String>), 1);

        assert_eq!(ctx.check_sensitive_info("http://shop.local/contact").await, 1);
        assert_eq!(ctx.check_xss("http://shop.local/contact").await, 0);
        assert_eq!(ctx.check_sql_injection("http://shop.local/item?id=1").await, 4);

        let findings = ctx.findings();
        assert_eq!(findings.len(), 5);
        assert_eq!(findings[0].kind, FindingKind::SensitiveInfo);
    }

    #[tokio::test]
    async fn test_crawl_populates_visited_set() {
        let ctx = context(FnFetcher::new(site as fn(&str) -> Option<String>), 1);

        let pages = ctx.crawl("http://shop.local/").await;

        assert_eq!(pages.len(), 3);
        assert!(ctx.visited().contains("http://shop.local/item"));
        assert!(ctx.visited().contains("http://shop.local/contact"));
    }

    #[tokio::test]
    async fn test_cancelled_scan_returns_partial_report() {
        let ctx = context(FnFetcher::new(site as fn(&str) -> Option<String>), 2);
        ctx.control().cancel();

        let report = ctx.run(false).await;

        assert!(report.cancelled);
        assert!(report.pages.is_empty());
        assert!(report.findings.is_empty());
    }
}
