use colored::Colorize;
use tabled::{Table, Tabled, settings::{Style, Modify, object::Rows, Alignment}};

use crate::models::{FindingKind, ScanReport, Severity};
use super::sitemap::SiteMap;

pub struct ConsoleReporter;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Page")]
    url: String,
    #[tabled(rename = "Depth")]
    depth: usize,
    #[tabled(rename = "HTTP")]
    status: String,
    #[tabled(rename = "Findings")]
    findings: usize,
    #[tabled(rename = "Status")]
    severity: String,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_sitemap(&self, report: &ScanReport) {
        let map = SiteMap::from_report(report);

        let rows: Vec<TableRow> = map
            .entries()
            .iter()
            .map(|entry| TableRow {
                url: entry.url.clone(),
                depth: entry.depth,
                status: if entry.status == "ERR" {
                    entry.status.red().to_string()
                } else {
                    entry.status.clone()
                },
                findings: entry.findings,
                severity: Self::severity_label(entry.severity),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("\n{}", table);
    }

    pub fn print_summary(&self, report: &ScanReport) {
        let summary = report.summary();

        println!("\n{}", "Summary".bold().underline());
        println!(
            "{} pages crawled in {:.2}s, {} findings",
            summary.pages_crawled,
            summary.duration_ms as f64 / 1000.0,
            summary.total_findings
        );

        if summary.sql_injection_count > 0 {
            println!("  {}: {}", "SQL Injection".red().bold(), summary.sql_injection_count);
        }
        if summary.xss_count > 0 {
            println!("  {}: {}", "XSS".red(), summary.xss_count);
        }
        if summary.sensitive_info_count > 0 {
            println!("  {}: {}", "Sensitive Info".yellow(), summary.sensitive_info_count);
        }
        if summary.total_findings == 0 {
            println!("  {}", "No vulnerabilities found".green());
        }
        if report.cancelled {
            println!("  {}", "Scan was cancelled; results are partial".yellow());
        }
        println!();
    }

    pub fn print_details(&self, report: &ScanReport) {
        if report.findings.is_empty() {
            return;
        }

        println!("\n{}", "Findings".bold().underline());

        for finding in &report.findings {
            println!(
                "\n[{}] {}",
                Self::severity_label(Some(finding.severity)),
                finding.kind.to_string().white().bold()
            );
            println!("  URL: {}", finding.url.cyan());
            if let Some(param) = finding.parameter() {
                println!("  Parameter: {}", param.yellow());
                println!("  Payload: {}", finding.payload);
            }
            if let Some(info) = finding.info_type {
                println!("  Type: {}", info.to_string().yellow());
                println!("  Pattern: {}", finding.payload);
            }
            println!("  {}: {}", "Fix".cyan(), Self::get_recommendation(finding.kind));
        }
    }

    fn severity_label(severity: Option<Severity>) -> String {
        match severity {
            Some(Severity::Critical) => "CRITICAL".red().bold().to_string(),
            Some(Severity::High) => "HIGH".red().to_string(),
            Some(Severity::Medium) => "MEDIUM".yellow().to_string(),
            Some(Severity::Low) => "LOW".blue().to_string(),
            Some(Severity::Info) => "INFO".cyan().to_string(),
            None => "OK".green().to_string(),
        }
    }

    fn get_recommendation(kind: FindingKind) -> &'static str {
        match kind {
            FindingKind::SqlInjection => "Use parameterized queries and hide database errors from responses",
            FindingKind::Xss => "HTML-encode user input before writing it into the page",
            FindingKind::SensitiveInfo => "Remove or mask personal data and credentials from public pages",
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
