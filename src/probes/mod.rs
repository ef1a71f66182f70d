mod sensitive;
mod sqli;
mod xss;

pub use sensitive::SensitiveInfoProbe;
pub use sqli::SqlInjectionProbe;
pub use xss::XssProbe;

use url::Url;

/// A request URL with one parameter value swapped for an attack payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub parameter: String,
    pub payload: &'static str,
    pub url: String,
}

/// Distinct non-empty query parameters, first value each, in appearance order.
pub fn query_params(url: &str) -> Vec<(String, String)> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };

    let mut params: Vec<(String, String)> = Vec::new();
    for (name, value) in parsed.query_pairs() {
        if params.iter().any(|(seen, _)| seen.as_str() == name) {
            continue;
        }
        params.push((name.into_owned(), value.into_owned()));
    }
    params.retain(|(_, value)| !value.is_empty());
    params
}

/// Replaces every literal `name=value` run in `url`; `None` if there is none.
pub fn substitute(url: &str, name: &str, value: &str, replacement: &str) -> Option<String> {
    let needle = format!("{}={}", name, value);
    if !url.contains(&needle) {
        return None;
    }
    Some(url.replace(&needle, &format!("{}={}", name, replacement)))
}

/// Every payload × parameter variant of `url`, payload-major.
pub fn build_variants<F>(url: &str, payloads: &[&'static str], encode: F) -> Vec<Variant>
where
    F: Fn(&str) -> String,
{
    let params = query_params(url);
    let mut variants = Vec::with_capacity(payloads.len() * params.len());

    for &payload in payloads {
        let written = encode(payload);
        for (name, value) in &params {
            if let Some(variant_url) = substitute(url, name, value, &written) {
                variants.push(Variant {
                    parameter: name.clone(),
                    payload,
                    url: variant_url,
                });
            }
        }
    }

    variants
}
