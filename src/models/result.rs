use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Finding, FindingKind, Severity};

/// A successfully received HTTP response. Built fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub url: String,
    pub status: u16,
    pub size: usize,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl ResponseInfo {
    pub fn new(url: impl Into<String>, status: u16, body: String, duration_ms: u64) -> Self {
        Self {
            url: url.into(),
            status,
            size: body.len(),
            body,
            headers: HashMap::new(),
            duration_ms,
        }
    }
}

/// One step of the crawl's visit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledPage {
    /// Full URL as requested, query string intact.
    pub url: String,
    pub normalized: String,
    pub depth: usize,
    pub status: Option<u16>,
    pub links_found: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub scan_time: String,
    pub max_depth: usize,
    pub pages: Vec<CrawledPage>,
    pub findings: Vec<Finding>,
    pub duration_ms: u64,
    pub cancelled: bool,
}

impl ScanReport {
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_findings(self.pages.len(), &self.findings, self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub pages_crawled: usize,
    pub total_findings: usize,
    pub duration_ms: u64,
    pub sql_injection_count: usize,
    pub xss_count: usize,
    pub sensitive_info_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub info_count: usize,
}

impl ScanSummary {
    pub fn from_findings(pages_crawled: usize, findings: &[Finding], duration_ms: u64) -> Self {
        let mut summary = Self {
            pages_crawled,
            total_findings: findings.len(),
            duration_ms,
            sql_injection_count: 0,
            xss_count: 0,
            sensitive_info_count: 0,
            critical_count: 0,
            high_count: 0,
            medium_count: 0,
            low_count: 0,
            info_count: 0,
        };

        for finding in findings {
            match finding.kind {
                FindingKind::SqlInjection => summary.sql_injection_count += 1,
                FindingKind::Xss => summary.xss_count += 1,
                FindingKind::SensitiveInfo => summary.sensitive_info_count += 1,
            }
            match finding.severity {
                Severity::Critical => summary.critical_count += 1,
                Severity::High => summary.high_count += 1,
                Severity::Medium => summary.medium_count += 1,
                Severity::Low => summary.low_count += 1,
                Severity::Info => summary.info_count += 1,
            }
        }

        summary
    }
}
