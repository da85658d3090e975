use crate::{
    error::Result,
    models::{photo::PhotoResult, session::Session},
    state::AppState,
};

/// Scores every photo in the session and orders them best first.
///
/// Photos without votes score zero. Equal scores keep upload order.
pub fn rank_photos(session: &Session) -> Vec<PhotoResult> {
    let mut results: Vec<PhotoResult> = session
        .photos
        .iter()
        .map(|photo| PhotoResult::new(photo.clone(), session.votes.get(&photo.id)))
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Ranks the photos of a stored session.
pub async fn rank(state: &AppState, session_id: &str) -> Result<Vec<PhotoResult>> {
    let session = state.sessions.get(session_id).await?;
    Ok(rank_photos(&session))
}
