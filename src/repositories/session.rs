use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// Stores each session as `<id>.json` inside a single directory.
///
/// Writes replace the whole document. With `atomic_writes` the document is
/// written to a sibling temp file and renamed over the old one.
#[derive(Clone, Debug)]
pub struct SessionRepository {
    dir: PathBuf,
    atomic_writes: bool,
}

impl SessionRepository {
    /// Creates a repository rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, atomic_writes: bool) -> Self {
        Self {
            dir: dir.into(),
            atomic_writes,
        }
    }

    /// The directory session documents live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the storage directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Serializes `session` to its file, overwriting previous content.
    pub async fn save(&self, session: &Session) -> Result<()> {
        let path = self
            .path_for(&session.id)
            .ok_or_else(|| {
                AppError::Internal(format!("Refusing to persist unsafe session id {:?}", session.id))
            })?;
        let document = sonic_rs::to_string_pretty(session)?;

        if self.atomic_writes {
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, document.as_bytes()).await?;
            fs::rename(&tmp, &path).await?;
        } else {
            fs::write(&path, document.as_bytes()).await?;
        }

        tracing::debug!("💾 Session {} written to {}", session.id, path.display());
        Ok(())
    }

    /// Reads one session document, `None` if it was never persisted.
    pub async fn load(&self, session_id: &str) -> Result<Option<Session>> {
        let Some(path) = self.path_for(session_id) else {
            return Ok(None);
        };

        let document = match fs::read_to_string(&path).await {
            Ok(document) => document,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Session = sonic_rs::from_str(&document)?;
        Ok(Some(session))
    }

    /// Loads every session document in the directory.
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub async fn load_all(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();

        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(sessions),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let Some(session_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match self.load(session_id).await {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("⚠️ Skipping unreadable session file {}: {}", path.display(), e);
                }
            }
        }

        Ok(sessions)
    }

    fn path_for(&self, session_id: &str) -> Option<PathBuf> {
        is_safe_id(session_id).then(|| self.dir.join(format!("{}.json", session_id)))
    }
}

/// Ids become file names, so only a conservative alphabet is accepted.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
