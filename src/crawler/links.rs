use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Every `<a href>` target in document order, resolved against `page_url`.
/// Fragments are stripped; hrefs that cannot be resolved are dropped.
pub fn extract_links(page_url: &Url, html: &str) -> Vec<Url> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .filter_map(|href| page_url.join(href).ok())
        .map(|mut resolved| {
            resolved.set_fragment(None);
            resolved
        })
        .collect()
}
