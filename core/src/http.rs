//! HTTP transport types shared by the course resource and its messengers.
//!
//! # Design
//! Requests and responses are plain data. `CourseResource` builds
//! `HttpRequest` values and parses `HttpResponse` values; a
//! `CanvasMessenger` performs the actual exchange in between. Keeping the
//! types owned (`String`, `Vec`) lets stub messengers in tests hand back
//! canned responses without any lifetimes to thread through.

/// HTTP method for a request. Canvas course operations never update in
/// place, so there is no `Put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL including any query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive lookup of the first header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// One HTTP exchange as seen by the parsing step.
///
/// `error_happened` is the messenger's verdict on the exchange. Course
/// operations treat it exactly like a non-200 status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub error_happened: bool,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Build a response, flagging any status outside `200..=299` as an error.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            error_happened: !(200..=299).contains(&status),
            headers,
            body: body.into(),
        }
    }

    /// Case-insensitive lookup of the first header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// All values of headers named `name`, in the order received.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// True when the exchange succeeded with exactly 200, the only status
    /// course operations accept.
    pub fn is_ok(&self) -> bool {
        !self.error_happened && self.status == 200
    }

    /// Canvas signals a bad or expired token with 401 plus a
    /// `WWW-Authenticate` challenge. A bare 401 is a permission failure.
    pub fn is_invalid_token(&self) -> bool {
        self.status == 401 && self.header("www-authenticate").is_some()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flags_non_success_statuses() {
        assert!(!HttpResponse::new(200, Vec::new(), "").error_happened);
        assert!(!HttpResponse::new(204, Vec::new(), "").error_happened);
        assert!(HttpResponse::new(404, Vec::new(), "").error_happened);
        assert!(HttpResponse::new(500, Vec::new(), "").error_happened);
    }

    #[test]
    fn is_ok_requires_exactly_200() {
        assert!(HttpResponse::new(200, Vec::new(), "").is_ok());
        assert!(!HttpResponse::new(201, Vec::new(), "").is_ok());

        let mut flagged = HttpResponse::new(200, Vec::new(), "");
        flagged.error_happened = true;
        assert!(!flagged.is_ok());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(
            200,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            "",
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("link"), None);
    }

    #[test]
    fn invalid_token_needs_challenge_header() {
        let bare = HttpResponse::new(401, Vec::new(), "");
        assert!(!bare.is_invalid_token());

        let challenged = HttpResponse::new(
            401,
            vec![("WWW-Authenticate".to_string(), "Bearer realm=\"canvas-lms\"".to_string())],
            "",
        );
        assert!(challenged.is_invalid_token());
    }
}
