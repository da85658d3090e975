use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use tokio::time::{timeout, Duration};

use crate::{
    error::{AppError, Result},
    handlers::response::json,
    models::photo::Photo,
    services::uploads::{self as upload_service, IncomingFile},
    state::AppState,
    validation::upload as upload_rules,
};

/// The multipart field photos are sent under.
const PHOTOS_FIELD: &str = "photos";
/// How long to wait for the next multipart field.
const UPLOAD_TIMEOUT: u64 = 300;

/// The response payload for an upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub files: Vec<Photo>,
    pub message: String,
}

/// Receives a batch of photos for a session.
#[axum::debug_handler]
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response> {
    state.sessions.get(&session_id).await?;

    let policy = state.upload_policy();
    let timeout_duration = Duration::from_secs(UPLOAD_TIMEOUT);
    let mut files: Vec<IncomingFile> = Vec::new();

    loop {
        let mut field = match timeout(timeout_duration, multipart.next_field()).await {
            Ok(Ok(Some(field))) => field,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(AppError::Multipart(format!("Parse error: {}", e))),
            Err(_) => return Err(AppError::Multipart("Upload timeout exceeded".into())),
        };

        if field.name() != Some(PHOTOS_FIELD) {
            continue;
        }

        upload_rules::validate_file_count(files.len() + 1, &policy)?;

        let original_name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Multipart(format!("{}: {}", original_name, e)))?
        {
            data.extend_from_slice(&chunk);
            upload_rules::validate_file_size(&original_name, data.len(), &policy)?;
        }

        files.push(IncomingFile {
            original_name,
            content_type,
            bytes: data.into(),
        });
    }

    tracing::info!(
        "📤 Upload of {} file(s) to session {}",
        files.len(),
        session_id
    );

    let photos = upload_service::add_photos(&state, &session_id, files).await?;

    let message = format!("{} file(s) uploaded successfully", photos.len());
    json(
        StatusCode::OK,
        &UploadResponse {
            success: true,
            files: photos,
            message,
        },
    )
}
