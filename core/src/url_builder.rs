//! Canvas REST URL construction.

use crate::params::Params;

/// Build `{base_url}/api/v{api_version}/{path}` plus an encoded query string.
///
/// A trailing `/` on `base_url` and a leading `/` on `path` are dropped so
/// callers need not care how either was written. No `?` is appended when the
/// parameters encode to nothing.
pub fn build_canvas_url(base_url: &str, api_version: u32, path: &str, params: &Params) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let query = params.encode();
    if query.is_empty() {
        format!("{base}/api/v{api_version}/{path}")
    } else {
        format!("{base}/api/v{api_version}/{path}?{query}")
    }
}
