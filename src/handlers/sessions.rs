use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

use crate::{
    error::{AppError, Result},
    handlers::response::json,
    models::session::ProjectSummary,
    state::AppState,
};

/// The cookie carrying the caller's owner identity.
pub const OWNER_COOKIE: &str = "userId";

/// The optional request payload for creating a session.
#[derive(Deserialize, Debug, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// The response payload for a created session.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub user_id: String,
}

/// The request payload for renaming a project.
#[derive(Deserialize, Debug)]
pub struct RenameRequest {
    #[serde(default)]
    pub name: String,
}

/// The response payload for a rename.
#[derive(Serialize)]
pub struct RenameResponse {
    pub success: bool,
    pub name: String,
}

/// The response payload for the caller's project listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectSummary>,
    pub user_id: Option<String>,
}

/// Creates the long-lived owner cookie.
fn create_owner_cookie(value: String, max_age_days: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(OWNER_COOKIE, value);

    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::days(max_age_days));
    cookie.set_path("/");

    cookie
}

fn owner_from_cookies(cookies: &Cookies) -> Option<String> {
    cookies
        .get(OWNER_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.trim().is_empty())
}

/// Creates a session owned by the caller.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    cookies: Cookies,
    body: Bytes,
) -> Result<Response> {
    let req: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        sonic_rs::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?
    };

    let session = state
        .sessions
        .create(req.name, owner_from_cookies(&cookies))
        .await?;

    cookies.add(create_owner_cookie(
        session.owner_id.clone(),
        state.config.owner_cookie_days,
        state.config.secure_cookies,
    ));

    json(
        StatusCode::OK,
        &CreateSessionResponse {
            session_id: session.id,
            user_id: session.owner_id,
        },
    )
}

/// Returns the raw session document.
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response> {
    let session = state.sessions.get(&session_id).await?;
    json(StatusCode::OK, &session)
}

/// Lists the sessions owned by the caller's cookie identity.
#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Response> {
    let user_id = owner_from_cookies(&cookies);
    let projects = state.sessions.list_by_owner(user_id.as_deref()).await;

    tracing::debug!("📂 Listing {} project(s) for {:?}", projects.len(), user_id);

    json(StatusCode::OK, &ProjectsResponse { projects, user_id })
}

/// Renames a project.
#[axum::debug_handler]
pub async fn rename_project(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<RenameRequest>,
) -> Result<Response> {
    let name = state.sessions.rename(&session_id, &req.name).await?;
    json(StatusCode::OK, &RenameResponse { success: true, name })
}
