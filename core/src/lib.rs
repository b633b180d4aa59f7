//! Blocking client for the Canvas LMS courses API.
//!
//! # Overview
//! `CourseResource` lists, fetches, creates and deletes courses. It builds
//! plain-data `HttpRequest` values, hands them to a `CanvasMessenger` for
//! the network round-trip, and decodes the `HttpResponse` with a
//! `ResponseParser`.
//!
//! # Design
//! - Every operation has pure `build_*` / `parse_*` halves, so request
//!   shapes and the failure policy are testable without I/O.
//! - `UreqMessenger` is the production messenger; tests substitute their own.
//! - Collections are paged by Canvas; `CanvasMessenger::execute_paginated`
//!   follows `Link: rel="next"` headers and the pages are flattened in order.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use canvas_core::{CanvasConfig, CourseResource, ListCoursesOptions, UreqMessenger};
//!
//! # fn main() -> Result<(), canvas_core::ApiError> {
//! let config = CanvasConfig::from_env()?;
//! let courses = CourseResource::new(&config, UreqMessenger::new());
//! for course in courses.list_courses(&ListCoursesOptions::default())? {
//!     println!("{:?} {:?}", course.id, course.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod courses;
pub mod error;
pub mod http;
pub mod messenger;
pub mod pagination;
pub mod params;
pub mod parser;
pub mod types;
pub mod url_builder;

pub use config::CanvasConfig;
pub use courses::CourseResource;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use messenger::{CanvasMessenger, UreqMessenger};
pub use params::Params;
pub use parser::{JsonParser, ResponseParser};
pub use types::{
    Course, CourseIncludes, CourseState, Delete, Enrollment, EnrollmentType, ListCoursesOptions, Term,
};
pub use url_builder::build_canvas_url;
