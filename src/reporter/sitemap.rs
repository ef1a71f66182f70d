use crate::models::{ScanReport, Severity};

/// Per-page view of a report: what was crawled and how bad it looked.
pub struct SiteMap {
    entries: Vec<SiteMapEntry>,
}

pub struct SiteMapEntry {
    pub url: String,
    pub depth: usize,
    pub status: String,
    pub findings: usize,
    pub severity: Option<Severity>,
}

impl SiteMap {
    pub fn from_report(report: &ScanReport) -> Self {
        let entries = report
            .pages
            .iter()
            .map(|page| {
                let page_findings: Vec<_> = report
                    .findings
                    .iter()
                    .filter(|f| f.url == page.url)
                    .collect();

                SiteMapEntry {
                    url: page.url.clone(),
                    depth: page.depth,
                    status: page
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "ERR".to_string()),
                    findings: page_findings.len(),
                    severity: page_findings
                        .iter()
                        .map(|f| f.severity)
                        .max_by_key(|s| s.numeric_value()),
                }
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[SiteMapEntry] {
        &self.entries
    }
}
