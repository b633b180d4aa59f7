//! Executing `HttpRequest` values against Canvas.
//!
//! # Design
//! `CourseResource` never touches the network itself; it hands each built
//! request to a `CanvasMessenger`. The trait has a single required method so
//! tests can script responses, and pagination is a provided method layered
//! on top of it. `UreqMessenger` is the blocking production implementation.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::pagination::next_page_url;

/// Performs HTTP exchanges on behalf of `CourseResource`.
pub trait CanvasMessenger {
    /// Execute one request and return its response.
    ///
    /// Non-2xx statuses are returned as data with `error_happened` set.
    /// `Err` is reserved for exchanges that could not complete at all.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;

    /// Execute a GET and follow `Link: rel="next"` until the last page.
    ///
    /// Stops early after a page flagged as an error, or if Canvas points
    /// back at any URL already fetched. Every page carries the headers of
    /// the first request.
    fn execute_paginated(&self, request: &HttpRequest) -> Result<Vec<HttpResponse>, ApiError> {
        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        let mut current = request.clone();
        loop {
            visited.insert(current.path.clone());
            let response = self.execute(&current)?;
            let next = next_page_url(&response);
            let failed = response.error_happened;
            pages.push(response);
            match next {
                Some(url) if !failed && !visited.contains(&url) => {
                    debug!(url = %url, page = pages.len() + 1, "following canvas pagination");
                    current = HttpRequest {
                        method: HttpMethod::Get,
                        path: url,
                        headers: request.headers.clone(),
                        body: None,
                    };
                }
                _ => break,
            }
        }
        Ok(pages)
    }
}

impl<M: CanvasMessenger + ?Sized> CanvasMessenger for &M {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking messenger backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqMessenger {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqMessenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqMessenger").finish_non_exhaustive()
    }
}

impl UreqMessenger {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent. It must have `http_status_as_error`
    /// disabled, otherwise 4xx/5xx surface as `ApiError::Transport`.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqMessenger {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl CanvasMessenger for UreqMessenger {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending canvas request");

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&request.path), &request.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.path), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&request.path), &request.headers).send_empty(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(&request.path).force_send_body(), &request.headers)
                    .send(body.as_bytes())
            }
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(&request.path), &request.headers).call(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = HttpResponse::new(status, headers, body);
        if response.is_invalid_token() {
            warn!(url = %request.path, "canvas rejected the oauth token");
            return Err(ApiError::InvalidOauthToken);
        }
        if response.error_happened {
            debug!(status, url = %request.path, "canvas returned an error status");
        }
        Ok(response)
    }
}
