//! Canvas `Link` header pagination.
//!
//! Canvas pages every collection endpoint and advertises the neighbours in
//! one or more `Link` headers:
//!
//! ```text
//! Link: <https://canvas/api/v1/courses?page=2&per_page=10>; rel="next",
//!       <https://canvas/api/v1/courses?page=1&per_page=10>; rel="first"
//! ```

use crate::http::HttpResponse;

/// URL of the next page, if the response advertises one.
pub fn next_page_url(response: &HttpResponse) -> Option<String> {
    response
        .header_values("link")
        .flat_map(parse_link_header)
        .find(|(_, rel)| rel == "next")
        .map(|(url, _)| url)
}

/// Split a `Link` header value into `(url, rel)` pairs. Entries without a
/// `rel` parameter are skipped.
///
/// Targets are read between `<` and `>` first, so commas inside a URL do not
/// split the entry.
fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut links = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find('<') {
        let Some(len) = rest[open..].find('>') else {
            break;
        };
        let url = &rest[open + 1..open + len];
        let after = &rest[open + len + 1..];
        let params_end = after.find('<').unwrap_or(after.len());
        let rel = after[..params_end].split(';').find_map(|param| {
            let (key, value) = param.split_once('=')?;
            let value = value.trim().trim_end_matches(',').trim_end().trim_matches('"');
            (key.trim() == "rel").then(|| value.to_string())
        });
        if let Some(rel) = rel {
            links.push((url.to_string(), rel));
        }
        rest = &after[params_end..];
    }
    links
}
