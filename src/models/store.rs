use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Finding;

/// Append-only, insertion-ordered finding log shared by concurrent probes.
#[derive(Debug, Default)]
pub struct FindingsStore {
    findings: Mutex<Vec<Finding>>,
}

impl FindingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, finding: Finding) {
        self.lock().push(finding);
    }

    pub fn extend(&self, findings: impl IntoIterator<Item = Finding>) {
        self.lock().extend(findings);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Finding> {
        self.lock().clone()
    }

    pub fn into_inner(self) -> Vec<Finding> {
        self.findings
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panicking probe must not hide what other probes already recorded.
    fn lock(&self) -> MutexGuard<'_, Vec<Finding>> {
        self.findings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Normalized URLs already claimed by the crawl.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `normalized` was not present and is now claimed.
    /// Check and insert happen under one lock.
    pub fn insert(&self, normalized: &str) -> bool {
        self.lock().insert(normalized.to_string())
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.lock().contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
