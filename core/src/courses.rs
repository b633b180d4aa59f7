//! Course operations against the Canvas REST API.
//!
//! # Design
//! Each operation is split the same way: a `build_*` method produces an
//! `HttpRequest`, a `parse_*` method interprets the `HttpResponse`, and a
//! convenience method runs one through the messenger into the other. The
//! build/parse halves are pure, so request shapes and the failure policy can
//! be checked without a server.
//!
//! The failure policy is coarse: anything but a clean 200 means "did not
//! happen", whether the course is missing, forbidden or the server broke. `get` and
//! `create` return `None`, `delete` returns `false`. Only transport
//! failures, token rejection and a 200 body of the wrong shape surface as
//! `ApiError`.

use tracing::{debug, info};

use crate::config::CanvasConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::messenger::CanvasMessenger;
use crate::params::Params;
use crate::parser::{JsonParser, ResponseParser};
use crate::types::{Course, CourseIncludes, Delete, ListCoursesOptions};
use crate::url_builder::build_canvas_url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Reads and writes Canvas courses through a `CanvasMessenger`.
///
/// `list_courses` and `get_single_course` authenticate with the token from
/// `CanvasConfig`; `create_course` and `delete_course` take the token per
/// call so writes can run as a different principal.
#[derive(Debug, Clone)]
pub struct CourseResource<M, P = JsonParser> {
    base_url: String,
    api_version: u32,
    oauth_token: String,
    account_id: String,
    messenger: M,
    parser: P,
}

impl<M: CanvasMessenger> CourseResource<M> {
    pub fn new(config: &CanvasConfig, messenger: M) -> Self {
        Self::with_parser(config, messenger, JsonParser)
    }
}

impl<M, P> CourseResource<M, P> {
    pub fn with_parser(config: &CanvasConfig, messenger: M, parser: P) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version,
            oauth_token: config.oauth_token.clone(),
            account_id: config.account_id.clone(),
            messenger,
            parser,
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    fn url(&self, path: &str, params: &Params) -> String {
        let url = build_canvas_url(&self.base_url, self.api_version, path, params);
        debug!(url = %url, "final url of api call");
        url
    }

    pub fn build_list_courses(&self, options: &ListCoursesOptions) -> HttpRequest {
        let mut params = Params::new();
        if let Some(enrollment_type) = options.enrollment_type {
            params.put_one("enrollment_type", enrollment_type.name());
        }
        if let Some(role_id) = options.enrollment_role_id {
            params.put_one("enrollment_role_id", role_id.to_string());
        }
        params.put("include[]", options.include.iter().map(|i| i.name()));
        params.put("state[]", options.state.iter().map(|s| s.name()));

        HttpRequest {
            method: HttpMethod::Get,
            path: self.url("courses", &params),
            headers: vec![bearer(&self.oauth_token)],
            body: None,
        }
    }

    pub fn build_get_single_course(&self, course_id: &str, includes: &[CourseIncludes]) -> HttpRequest {
        let mut params = Params::new();
        params.put("include[]", includes.iter().map(|i| i.name()));

        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(&format!("courses/{course_id}"), &params),
            headers: vec![bearer(&self.oauth_token)],
            body: None,
        }
    }

    /// Only `course_code` and `name` are sent; fields left as `None` are
    /// omitted from the form.
    pub fn build_create_course(&self, oauth_token: &str, course: &Course) -> HttpRequest {
        let mut form = Params::new();
        if let Some(code) = &course.course_code {
            form.put_one("course[course_code]", code.as_str());
        }
        if let Some(name) = &course.name {
            form.put_one("course[name]", name.as_str());
        }

        HttpRequest {
            method: HttpMethod::Post,
            path: self.url(&format!("accounts/{}/courses", self.account_id), &Params::new()),
            headers: form_headers(oauth_token),
            body: Some(form.encode()),
        }
    }

    pub fn build_delete_course(&self, oauth_token: &str, course_id: &str) -> HttpRequest {
        let mut form = Params::new();
        form.put_one("event", "delete");

        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(&format!("courses/{course_id}"), &Params::new()),
            headers: form_headers(oauth_token),
            body: Some(form.encode()),
        }
    }
}

impl<M, P: ResponseParser> CourseResource<M, P> {
    /// Flatten every page into one list, in page order. Pages are not
    /// status-checked; a page that is not a course array is an error.
    pub fn parse_list_courses(&self, pages: &[HttpResponse]) -> Result<Vec<Course>, ApiError> {
        let mut courses = Vec::new();
        for page in pages {
            courses.extend(self.parser.parse_to_list::<Course>(page)?);
        }
        Ok(courses)
    }

    pub fn parse_get_single_course(&self, response: &HttpResponse) -> Option<Course> {
        if !response.is_ok() {
            debug!(status = response.status, "course lookup did not succeed");
            return None;
        }
        self.parser.parse_to_object(response)
    }

    pub fn parse_create_course(&self, response: &HttpResponse) -> Option<Course> {
        if !response.is_ok() {
            debug!(status = response.status, body = %response.body, "failed to create course");
            return None;
        }
        self.parser.parse_to_object(response)
    }

    /// `false` for any failure status. A 200 whose body lacks the `delete`
    /// field is an error rather than `false`.
    pub fn parse_delete_course(&self, response: &HttpResponse) -> Result<bool, ApiError> {
        debug!(status = response.status, body = %response.body, "delete course response");
        if !response.is_ok() {
            debug!(status = response.status, "failed to delete course");
            return Ok(false);
        }
        self.parser
            .parse_to_object::<Delete>(response)
            .map(|parsed| parsed.delete)
            .ok_or_else(|| {
                ApiError::DeserializationError(format!("delete response has no `delete` field: {}", response.body))
            })
    }
}

impl<M: CanvasMessenger, P: ResponseParser> CourseResource<M, P> {
    pub fn list_courses(&self, options: &ListCoursesOptions) -> Result<Vec<Course>, ApiError> {
        info!("listing courses for user");
        let request = self.build_list_courses(options);
        let pages = self.messenger.execute_paginated(&request)?;
        self.parse_list_courses(&pages)
    }

    pub fn get_single_course(&self, course_id: &str, includes: &[CourseIncludes]) -> Result<Option<Course>, ApiError> {
        debug!(course_id, "getting course");
        let request = self.build_get_single_course(course_id, includes);
        let response = self.messenger.execute(&request)?;
        Ok(self.parse_get_single_course(&response))
    }

    pub fn create_course(&self, oauth_token: &str, course: &Course) -> Result<Option<Course>, ApiError> {
        let request = self.build_create_course(oauth_token, course);
        let response = self.messenger.execute(&request)?;
        Ok(self.parse_create_course(&response))
    }

    pub fn delete_course(&self, oauth_token: &str, course_id: &str) -> Result<bool, ApiError> {
        let request = self.build_delete_course(oauth_token, course_id);
        let response = self.messenger.execute(&request)?;
        self.parse_delete_course(&response)
    }
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

fn form_headers(token: &str) -> Vec<(String, String)> {
    vec![
        bearer(token),
        ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
    ]
}
