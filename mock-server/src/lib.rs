//! In-memory stand-in for the Canvas courses API.
//!
//! Serves the subset of `/api/v1` the client library talks to, with Canvas'
//! bearer-token check and `Link` header pagination, so client tests can run
//! over real HTTP.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Form, Path, RawQuery, State},
    http::{
        header::{AUTHORIZATION, HOST, LINK, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEFAULT_TOKEN: &str = "mock-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: u64,
    pub name: String,
    pub course_code: String,
    pub workflow_state: String,
    pub account_id: u64,
    pub start_at: Option<String>,
}

impl Course {
    pub fn available(id: u64, name: &str, course_code: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            course_code: course_code.to_string(),
            workflow_state: "available".to_string(),
            account_id: 1,
            start_at: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Token granting read and write access.
    pub token: String,
    /// Token that may read but gets 403 on writes.
    pub read_only_token: Option<String>,
    pub account_id: u64,
    /// Page size when the request has no `per_page`.
    pub page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            read_only_token: None,
            account_id: 1,
            page_size: 10,
        }
    }
}

pub type Db = Arc<RwLock<BTreeMap<u64, Course>>>;

#[derive(Clone)]
struct AppState {
    courses: Db,
    next_id: Arc<AtomicU64>,
    config: Arc<ServerConfig>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

pub fn app() -> Router {
    app_with(ServerConfig::default(), Vec::new())
}

pub fn app_with(config: ServerConfig, seed: Vec<Course>) -> Router {
    let next_id = seed.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let courses: BTreeMap<u64, Course> = seed.into_iter().map(|c| (c.id, c)).collect();
    let state = AppState {
        courses: Arc::new(RwLock::new(courses)),
        next_id: Arc::new(AtomicU64::new(next_id)),
        config: Arc::new(config),
    };
    Router::new()
        .route("/api/v1/courses", get(list_courses))
        .route("/api/v1/courses/{id}", get(get_course).delete(delete_course))
        .route("/api/v1/accounts/{account_id}/courses", post(create_course))
        .with_state(state)
}

/// Serve an empty course store with `config` until the listener closes.
pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    serve(listener, app_with(config, Vec::new())).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

fn authorize(state: &AppState, headers: &HeaderMap, access: Access) -> Result<(), Response> {
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == state.config.token => Ok(()),
        Some(token) if state.config.read_only_token.as_deref() == Some(token) => match access {
            Access::Read => Ok(()),
            Access::Write => Err((
                StatusCode::FORBIDDEN,
                Json(json!({
                    "status": "unauthorized",
                    "errors": [{"message": "user not authorized to perform that action"}]
                })),
            )
                .into_response()),
        },
        _ => Err((
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, "Bearer realm=\"canvas-lms\"")],
            Json(json!({"errors": [{"message": "Invalid access token."}]})),
        )
            .into_response()),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"errors": [{"message": "The specified resource does not exist."}]})),
    )
        .into_response()
}

async fn list_courses(State(state): State<AppState>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    if let Err(rejection) = authorize(&state, &headers, Access::Read) {
        return rejection;
    }

    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_deref().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    let number = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .filter(|n| *n >= 1)
    };
    let page = number("page").unwrap_or(1);
    let per_page = number("per_page").unwrap_or(state.config.page_size);
    let states: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k == "state[]")
        .map(|(_, v)| v.to_lowercase())
        .collect();

    let courses = state.courses.read().await;
    let matching: Vec<&Course> = courses
        .values()
        .filter(|c| states.is_empty() || states.contains(&c.workflow_state))
        .collect();
    // Pages past the addressable range are simply empty.
    let start = (page - 1).checked_mul(per_page).unwrap_or(usize::MAX);
    let items: Vec<Course> = matching.iter().skip(start).take(per_page).map(|c| (*c).clone()).collect();
    debug!(page, per_page, total = matching.len(), "listing courses");

    let mut response = Json(items).into_response();
    if start.saturating_add(per_page) < matching.len() {
        let host = headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        let page_url = |n: usize| {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (k, v) in pairs.iter().filter(|(k, _)| k != "page" && k != "per_page") {
                query.append_pair(k, v);
            }
            query.append_pair("page", &n.to_string());
            query.append_pair("per_page", &per_page.to_string());
            format!("http://{host}/api/v1/courses?{}", query.finish())
        };
        let link = format!(
            "<{}>; rel=\"current\",<{}>; rel=\"next\",<{}>; rel=\"first\"",
            page_url(page),
            page_url(page + 1),
            page_url(1)
        );
        if let Ok(value) = HeaderValue::from_str(&link) {
            response.headers_mut().insert(LINK, value);
        }
    }
    response
}

async fn get_course(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = authorize(&state, &headers, Access::Read) {
        return rejection;
    }
    let Ok(id) = id.parse::<u64>() else {
        return not_found();
    };
    let courses = state.courses.read().await;
    match courses.get(&id) {
        Some(course) => Json(course.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers, Access::Write) {
        return rejection;
    }
    if account_id.parse::<u64>().ok() != Some(state.config.account_id) {
        return not_found();
    }

    let course = Course {
        id: state.next_id.fetch_add(1, Ordering::SeqCst),
        name: form
            .get("course[name]")
            .cloned()
            .unwrap_or_else(|| "Unnamed Course".to_string()),
        course_code: form
            .get("course[course_code]")
            .cloned()
            .unwrap_or_else(|| "Unnamed".to_string()),
        workflow_state: "unpublished".to_string(),
        account_id: state.config.account_id,
        start_at: None,
    };
    info!(id = course.id, name = %course.name, "created course");
    state.courses.write().await.insert(course.id, course.clone());
    Json(course).into_response()
}

async fn delete_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers, Access::Write) {
        return rejection;
    }
    let Ok(id) = id.parse::<u64>() else {
        return not_found();
    };

    let mut courses = state.courses.write().await;
    if !courses.contains_key(&id) {
        return not_found();
    }
    match form.get("event").map(String::as_str) {
        Some("delete") => {
            courses.remove(&id);
            info!(id, "deleted course");
            Json(json!({"delete": true})).into_response()
        }
        Some("conclude") => {
            if let Some(course) = courses.get_mut(&id) {
                course.workflow_state = "completed".to_string();
            }
            info!(id, "concluded course");
            Json(json!({"conclude": true})).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Only 'delete' and 'conclude' events are allowed."})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_serializes_canvas_field_names() {
        let course = Course::available(7, "Biology", "BIO-101");
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["course_code"], "BIO-101");
        assert_eq!(json["workflow_state"], "available");
        assert!(json["start_at"].is_null());
    }

    #[test]
    fn default_config_uses_root_account() {
        let config = ServerConfig::default();
        assert_eq!(config.token, DEFAULT_TOKEN);
        assert_eq!(config.account_id, 1);
        assert!(config.read_only_token.is_none());
    }
}
