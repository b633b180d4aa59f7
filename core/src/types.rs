//! Domain records and request enums for the Canvas courses API.
//!
//! # Design
//! Canvas omits or nulls most course fields depending on the caller's
//! permissions and the `include[]` flags sent, so every field is optional
//! and unknown fields are ignored. The same `Course` type is used as the
//! input to `create_course`, where only `name` and `course_code` are read.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Canvas course as returned by `/api/v1/courses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Course {
    pub id: Option<u64>,
    pub sis_course_id: Option<String>,
    pub uuid: Option<String>,
    pub integration_id: Option<String>,
    pub name: Option<String>,
    pub course_code: Option<String>,
    pub workflow_state: Option<String>,
    pub account_id: Option<u64>,
    pub root_account_id: Option<u64>,
    pub enrollment_term_id: Option<u64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    pub time_zone: Option<String>,
    pub default_view: Option<String>,
    pub syllabus_body: Option<String>,
    pub public_description: Option<String>,
    pub is_public: Option<bool>,
    pub total_students: Option<u32>,
    pub needs_grading_count: Option<u32>,
    pub storage_quota_mb: Option<u64>,
    pub hide_final_grades: Option<bool>,
    pub apply_assignment_group_weights: Option<bool>,
    pub license: Option<String>,
    pub course_format: Option<String>,
    pub restrict_enrollments_to_course_dates: Option<bool>,
    pub term: Option<Term>,
    pub enrollments: Option<Vec<Enrollment>>,
}

impl Course {
    /// Minimal input for `create_course`.
    pub fn new(name: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            course_code: Some(course_code.into()),
            ..Self::default()
        }
    }
}

/// Enrollment term, present when `include[]=TERM` was requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Term {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

/// The caller's enrollment in a course. Scores are only filled in with
/// `include[]=TOTAL_SCORES`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Enrollment {
    #[serde(rename = "type")]
    pub enrollment_type: Option<String>,
    pub role: Option<String>,
    pub role_id: Option<u64>,
    pub user_id: Option<u64>,
    pub enrollment_state: Option<String>,
    pub computed_current_score: Option<f64>,
    pub computed_final_score: Option<f64>,
    pub computed_current_grade: Option<String>,
    pub computed_final_grade: Option<String>,
}

/// Body of a successful `DELETE /courses/{id}`: `{"delete": true}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delete {
    pub delete: bool,
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Name sent on the wire.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {other}", stringify!($name))),
                }
            }
        }
    };
}

wire_enum! {
    /// Restricts `list_courses` to courses where the caller has this role.
    EnrollmentType {
        Teacher => "TEACHER",
        Student => "STUDENT",
        Ta => "TA",
        Observer => "OBSERVER",
        Designer => "DESIGNER",
    }
}

wire_enum! {
    /// Optional data Canvas attaches to each course via `include[]`.
    CourseIncludes {
        NeedsGradingCount => "NEEDS_GRADING_COUNT",
        SyllabusBody => "SYLLABUS_BODY",
        PublicDescription => "PUBLIC_DESCRIPTION",
        TotalScores => "TOTAL_SCORES",
        CurrentGradingPeriodScores => "CURRENT_GRADING_PERIOD_SCORES",
        Term => "TERM",
        CourseProgress => "COURSE_PROGRESS",
        Sections => "SECTIONS",
        StorageQuotaUsedMb => "STORAGE_QUOTA_USED_MB",
        TotalStudents => "TOTAL_STUDENTS",
        PassbackStatus => "PASSBACK_STATUS",
        Favorites => "FAVORITES",
        Teachers => "TEACHERS",
        ObservedUsers => "OBSERVED_USERS",
        CourseImage => "COURSE_IMAGE",
    }
}

wire_enum! {
    /// Course workflow states accepted by the `state[]` filter.
    CourseState {
        Unpublished => "UNPUBLISHED",
        Available => "AVAILABLE",
        Completed => "COMPLETED",
        Deleted => "DELETED",
    }
}

/// Filters for `list_courses`. The default lists every course visible to
/// the token with no extra includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCoursesOptions {
    pub enrollment_type: Option<EnrollmentType>,
    pub enrollment_role_id: Option<u64>,
    pub include: Vec<CourseIncludes>,
    pub state: Vec<CourseState>,
}
