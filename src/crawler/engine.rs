use tracing::{debug, warn};
use url::Url;

use super::{extract_links, normalize};
use crate::http::{PageFetcher, ScanControl};
use crate::models::{CrawledPage, ScanTarget, VisitedSet};

/// Depth-first, same-origin link walker.
///
/// The walk uses an explicit stack of `(url, depth)` pairs. Children are
/// pushed in reverse so anchors are followed in document order, which keeps
/// the visit sequence deterministic for a given set of pages.
pub struct Crawler<'a> {
    fetcher: &'a dyn PageFetcher,
    target: &'a ScanTarget,
    visited: &'a VisitedSet,
    control: &'a ScanControl,
}

impl<'a> Crawler<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        target: &'a ScanTarget,
        visited: &'a VisitedSet,
        control: &'a ScanControl,
    ) -> Self {
        Self {
            fetcher,
            target,
            visited,
            control,
        }
    }

    pub async fn crawl(&self, start_url: &str) -> Vec<CrawledPage> {
        self.crawl_with(start_url, |_| {}).await
    }

    /// Walks from `start_url`, calling `on_visit` once per claimed page.
    pub async fn crawl_with<F>(&self, start_url: &str, mut on_visit: F) -> Vec<CrawledPage>
    where
        F: FnMut(&CrawledPage),
    {
        let mut pages = Vec::new();

        let seed = match Url::parse(start_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = start_url, error = %e, "seed URL does not parse, nothing to crawl");
                return pages;
            }
        };

        let mut stack: Vec<(Url, usize)> = vec![(seed, 0)];

        while let Some((url, depth)) = stack.pop() {
            if self.control.is_cancelled() {
                warn!(remaining = stack.len() + 1, "crawl cancelled");
                break;
            }
            if depth > self.target.max_depth() {
                continue;
            }

            let normalized = normalize(url.as_str());
            if !self.target.in_scope(&normalized) {
                debug!(url = %url, "out of scope");
                continue;
            }
            if !self.visited.insert(&normalized) {
                continue;
            }

            let mut page = CrawledPage {
                url: url.to_string(),
                normalized,
                depth,
                status: None,
                links_found: 0,
            };

            let response = match self.fetcher.fetch(url.as_str(), self.control).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "error crawling page");
                    on_visit(&page);
                    pages.push(page);
                    continue;
                }
            };
            page.status = Some(response.status);

            let children = self.next_links(&url, &response.body);
            page.links_found = children.len();

            if depth < self.target.max_depth() {
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }

            on_visit(&page);
            pages.push(page);
        }

        pages
    }

    fn next_links(&self, page_url: &Url, body: &str) -> Vec<Url> {
        extract_links(page_url, body)
            .into_iter()
            .filter(|link| {
                let normalized = normalize(link.as_str());
                self.target.in_scope(&normalized) && !self.visited.contains(&normalized)
            })
            .collect()
    }
}
