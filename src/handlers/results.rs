use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    error::Result,
    handlers::response::json,
    services::results as result_service,
    state::AppState,
};

/// Returns the session's photos ranked by score.
#[axum::debug_handler]
pub async fn get_results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response> {
    let results = result_service::rank(&state, &session_id).await?;
    json(StatusCode::OK, &results)
}
