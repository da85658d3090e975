use crate::{
    error::{AppError, Result},
    models::vote::{Stance, VoteRecord},
    state::AppState,
};

/// Records `voter_id`'s stance on one photo, replacing any earlier stance.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session_id` - The session the photo belongs to.
/// * `photo_id` - The photo being voted on.
/// * `voter_id` - The caller-supplied voter identity.
/// * `stance` - Up, down, or clear.
///
/// # Returns
///
/// A `Result` containing the photo's `VoteRecord` after the vote.
pub async fn cast_vote(
    state: &AppState,
    session_id: &str,
    photo_id: &str,
    voter_id: &str,
    stance: Stance,
) -> Result<VoteRecord> {
    let allow_unknown = state.config.allow_votes_on_unknown_photos;

    let record = state
        .sessions
        .update(session_id, |session| {
            if !allow_unknown && !session.has_photo(photo_id) {
                return Err(AppError::PhotoNotFound);
            }

            let record = session.votes.entry(photo_id.to_string()).or_default();
            record.cast(voter_id, stance);
            Ok(record.clone())
        })
        .await?;

    tracing::debug!(
        "🗳️ Vote {:?} by {} on photo {} in session {}",
        stance,
        voter_id,
        photo_id,
        session_id
    );

    Ok(record)
}
