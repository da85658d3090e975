use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    handlers::response::json,
    models::vote::{Stance, VoteRecord},
    services::votes as vote_service,
    state::AppState,
};

/// The request payload for a vote.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub photo_id: String,
    #[serde(default)]
    pub vote: Stance,
    pub voter_id: String,
}

/// The response payload for a vote.
#[derive(Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub votes: VoteRecord,
}

/// Records a voter's stance on a photo.
#[axum::debug_handler]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Response> {
    let votes = vote_service::cast_vote(
        &state,
        &session_id,
        &req.photo_id,
        &req.voter_id,
        req.vote,
    )
    .await?;

    json(StatusCode::OK, &VoteResponse { success: true, votes })
}
