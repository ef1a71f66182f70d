use url::Url;

/// Canonical visited-set key: `scheme://host[:port]/path`, with query and
/// fragment dropped. Never fails; input that does not parse as an absolute
/// URL is cut at the first `#` or `?` and returned as-is.
pub fn normalize(url: &str) -> String {
    let trimmed = url.trim();

    let mut parsed = match Url::parse(trimmed) {
        Ok(parsed) => parsed,
        Err(_) => return strip_suffix_parts(trimmed).to_string(),
    };

    if parsed.cannot_be_a_base() {
        parsed.set_query(None);
        parsed.set_fragment(None);
        return parsed.to_string();
    }

    let host = parsed.host_str().unwrap_or("");
    match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, parsed.path()),
        None => format!("{}://{}{}", parsed.scheme(), host, parsed.path()),
    }
}

fn strip_suffix_parts(url: &str) -> &str {
    let end = url.find(['#', '?']).unwrap_or(url.len());
    &url[..end]
}
