use anyhow::{Result, Context};
use std::fs;
use tera::{Tera, Context as TeraContext};

use crate::models::{ScanReport, ScanSummary, Severity};
use super::sitemap::SiteMap;

pub struct JsonExporter;

impl JsonExporter {
    pub fn render(report: &ScanReport) -> Result<String> {
        let output = ExportData {
            report: report.clone(),
            summary: report.summary(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    pub fn export(report: &ScanReport, path: &str) -> Result<()> {
        let json = Self::render(report)?;
        fs::write(path, json).with_context(|| format!("Failed to write to {}", path))?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<ScanReport> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path))?;

        Self::parse(&content).with_context(|| format!("{} is not a scan export", path))
    }

    pub fn parse(content: &str) -> Result<ScanReport> {
        let data: ExportData = serde_json::from_str(content)?;
        Ok(data.report)
    }
}

pub struct HtmlExporter;

impl HtmlExporter {
    pub fn render(report: &ScanReport) -> Result<String> {
        let mut tera = Tera::default();
        tera.add_raw_template("report.html", TEMPLATE)?;

        let summary = report.summary();

        let mut context = TeraContext::new();
        context.insert("target", &report.target);
        context.insert("scan_time", &report.scan_time);
        context.insert("max_depth", &report.max_depth);
        context.insert("cancelled", &report.cancelled);
        context.insert("pages_crawled", &summary.pages_crawled);
        context.insert("total_findings", &summary.total_findings);
        context.insert("sqli_count", &summary.sql_injection_count);
        context.insert("xss_count", &summary.xss_count);
        context.insert("sensitive_count", &summary.sensitive_info_count);

        let pages: Vec<PageRow> = SiteMap::from_report(report)
            .entries()
            .iter()
            .map(|entry| PageRow {
                url: entry.url.clone(),
                depth: entry.depth,
                status: entry.status.clone(),
                findings: entry.findings,
                severity: entry.severity.map(|s| s.to_string()).unwrap_or_else(|| "OK".to_string()),
                severity_class: Self::severity_class(entry.severity),
            })
            .collect();

        let findings: Vec<FindingRow> = report
            .findings
            .iter()
            .map(|f| FindingRow {
                kind: f.kind.to_string(),
                url: f.url.clone(),
                detail: f.describe(),
                severity: f.severity.to_string(),
                severity_class: Self::severity_class(Some(f.severity)),
            })
            .collect();

        context.insert("pages", &pages);
        context.insert("findings", &findings);

        Ok(tera.render("report.html", &context)?)
    }

    pub fn export(report: &ScanReport, path: &str) -> Result<()> {
        let html = Self::render(report)?;
        fs::write(path, html).with_context(|| format!("Failed to write to {}", path))?;
        Ok(())
    }

    fn severity_class(severity: Option<Severity>) -> String {
        match severity {
            Some(Severity::Critical) => "critical",
            Some(Severity::High) => "high",
            Some(Severity::Medium) => "medium",
            Some(Severity::Low) => "low",
            Some(Severity::Info) => "info",
            None => "ok",
        }.to_string()
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>webprobe report - {{ target }}</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0d1117; color: #c9d1d9; line-height: 1.6; }
        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        h1 { color: #58a6ff; margin-bottom: 0.5rem; }
        h2 { margin: 2rem 0 1rem; }
        .subtitle { color: #8b949e; margin-bottom: 2rem; }
        .warning { color: #d29922; margin-bottom: 1rem; }
        .summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .stat { background: #161b22; border: 1px solid #30363d; border-radius: 6px; padding: 1rem; text-align: center; }
        .stat-value { font-size: 2rem; font-weight: bold; }
        .stat-label { color: #8b949e; font-size: 0.875rem; }
        .critical .stat-value { color: #f85149; }
        .high .stat-value { color: #f85149; }
        .medium .stat-value { color: #d29922; }
        table { width: 100%; border-collapse: collapse; background: #161b22; border: 1px solid #30363d; border-radius: 6px; overflow: hidden; }
        th, td { padding: 0.75rem 1rem; text-align: left; border-bottom: 1px solid #30363d; word-break: break-all; }
        th { background: #21262d; color: #c9d1d9; font-weight: 600; }
        tr:hover { background: #21262d; }
        .severity { padding: 0.25rem 0.5rem; border-radius: 4px; font-size: 0.75rem; font-weight: 600; }
        .severity.critical { background: #f8514933; color: #f85149; }
        .severity.high { background: #f8514933; color: #f85149; }
        .severity.medium { background: #d2992233; color: #d29922; }
        .severity.low { background: #58a6ff33; color: #58a6ff; }
        .severity.info { background: #8b949e33; color: #8b949e; }
        .severity.ok { background: #3fb95033; color: #3fb950; }
    </style>
</head>
<body>
    <div class="container">
        <h1>webprobe scan report</h1>
        <p class="subtitle">{{ target }} &middot; depth {{ max_depth }} &middot; {{ scan_time }}</p>
        {% if cancelled %}<p class="warning">Scan was cancelled before completion; results are partial.</p>{% endif %}

        <div class="summary">
            <div class="stat">
                <div class="stat-value">{{ pages_crawled }}</div>
                <div class="stat-label">Pages</div>
            </div>
            <div class="stat critical">
                <div class="stat-value">{{ sqli_count }}</div>
                <div class="stat-label">SQL Injection</div>
            </div>
            <div class="stat high">
                <div class="stat-value">{{ xss_count }}</div>
                <div class="stat-label">XSS</div>
            </div>
            <div class="stat medium">
                <div class="stat-value">{{ sensitive_count }}</div>
                <div class="stat-label">Sensitive Info</div>
            </div>
        </div>

        <h2>Findings ({{ total_findings }})</h2>
        <table>
            <thead>
                <tr><th>Severity</th><th>Type</th><th>URL</th><th>Detail</th></tr>
            </thead>
            <tbody>
                {% for f in findings %}
                <tr>
                    <td><span class="severity {{ f.severity_class }}">{{ f.severity }}</span></td>
                    <td>{{ f.kind }}</td>
                    <td>{{ f.url }}</td>
                    <td>{{ f.detail }}</td>
                </tr>
                {% endfor %}
            </tbody>
        </table>

        <h2>Crawled pages</h2>
        <table>
            <thead>
                <tr><th>Page</th><th>Depth</th><th>HTTP</th><th>Findings</th><th>Status</th></tr>
            </thead>
            <tbody>
                {% for p in pages %}
                <tr>
                    <td>{{ p.url }}</td>
                    <td>{{ p.depth }}</td>
                    <td>{{ p.status }}</td>
                    <td>{{ p.findings }}</td>
                    <td><span class="severity {{ p.severity_class }}">{{ p.severity }}</span></td>
                </tr>
                {% endfor %}
            </tbody>
        </table>
    </div>
</body>
</html>"#;

#[derive(serde::Serialize, serde::Deserialize)]
struct ExportData {
    #[serde(flatten)]
    report: ScanReport,
    summary: ScanSummary,
}

#[derive(serde::Serialize)]
struct PageRow {
    url: String,
    depth: usize,
    status: String,
    findings: usize,
    severity: String,
    severity_class: String,
}

#[derive(serde::Serialize)]
struct FindingRow {
    kind: String,
    url: String,
    detail: String,
    severity: String,
    severity_class: String,
}
