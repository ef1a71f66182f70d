pub mod cli;
pub mod crawler;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod probes;
pub mod reporter;
pub mod scanner;

pub use crawler::{Crawler, normalize};
pub use error::{ConfigError, FetchError};
pub use http::{HttpClient, PageFetcher, ScanControl};
pub use models::{
    CrawledPage, Finding, FindingKind, FindingsStore, InfoType, ScanConfig, ScanReport,
    ScanTarget, Severity, VisitedSet,
};
pub use probes::{SensitiveInfoProbe, SqlInjectionProbe, XssProbe};
pub use reporter::{ConsoleReporter, HtmlExporter, JsonExporter};
pub use scanner::ScanContext;
