mod finding;
mod result;
mod store;
mod target;

pub use finding::{Finding, FindingKind, InfoType, Severity};
pub use result::{CrawledPage, ResponseInfo, ScanReport, ScanSummary};
pub use store::{FindingsStore, VisitedSet};
pub use target::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ScanConfig,
    ScanTarget,
};
