use std::path::{Path, PathBuf};
use axum::body::Bytes;
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::photo::Photo,
    state::AppState,
    validation::upload::{self as upload_rules, UploadPolicy},
};

/// The public path prefix uploaded photos are served under.
pub const PUBLIC_UPLOAD_PREFIX: &str = "/uploads";

/// A file received from the client, not yet recorded.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// The name supplied by the uploader.
    pub original_name: String,
    /// The declared content type.
    pub content_type: Option<String>,
    /// The file contents.
    pub bytes: Bytes,
}

/// Builds a collision-resistant storage name that keeps the original extension.
pub fn storage_filename(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let extension = upload_rules::extension_of(original_name)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, extension)
}

/// The public path a storage name is served from.
pub fn public_path(filename: &str) -> String {
    format!("{}/{}", PUBLIC_UPLOAD_PREFIX, filename)
}

/// Checks every file in the batch; one bad file rejects all of them.
pub fn validate_batch(files: &[IncomingFile], policy: &UploadPolicy) -> Result<()> {
    upload_rules::validate_file_count(files.len(), policy)?;

    for file in files {
        upload_rules::validate_file_type(&file.original_name, file.content_type.as_deref())?;
        upload_rules::validate_file_size(&file.original_name, file.bytes.len(), policy)?;
    }

    Ok(())
}

/// Records a batch of photos against a session.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session_id` - The session receiving the photos.
/// * `files` - The uploaded files, in arrival order.
///
/// # Returns
///
/// A `Result` containing the created `Photo` records.
pub async fn add_photos(
    state: &AppState,
    session_id: &str,
    files: Vec<IncomingFile>,
) -> Result<Vec<Photo>> {
    state.sessions.get(session_id).await?;
    validate_batch(&files, &state.upload_policy())?;

    let upload_dir = &state.config.upload_dir;
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    let mut photos = Vec::with_capacity(files.len());

    for file in files {
        let filename = storage_filename(&file.original_name);
        let target = upload_dir.join(&filename);

        if let Err(e) = tokio::fs::write(&target, &file.bytes).await {
            tracing::error!("❌ Failed to store {}: {}", file.original_name, e);
            remove_files(&written).await;
            return Err(AppError::Io(e));
        }
        written.push(target);

        let mime_type = infer::get(&file.bytes)
            .map(|kind| kind.mime_type().to_string())
            .or(file.content_type);

        photos.push(Photo {
            id: Uuid::new_v4().to_string(),
            path: public_path(&filename),
            filename,
            original_name: file.original_name,
            size: file.bytes.len() as u64,
            mime_type,
            uploaded_at: Some(Utc::now()),
        });
    }

    let recorded = photos.clone();
    if let Err(e) = state
        .sessions
        .update(session_id, move |session| {
            session.photos.extend(recorded);
            Ok(())
        })
        .await
    {
        remove_files(&written).await;
        return Err(e);
    }

    tracing::info!(
        "📸 {} photo(s) added to session {}",
        photos.len(),
        session_id
    );

    Ok(photos)
}

async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        remove_file(path).await;
    }
}

async fn remove_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("⚠️ Could not remove {}: {}", path.display(), e);
    }
}
