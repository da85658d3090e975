use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::{ProjectSummary, Session},
    repositories::session::SessionRepository,
};

/// Process-wide map of sessions, mirrored to the session repository.
///
/// A lookup that misses the map falls back to the repository and caches the
/// result. A mutation reaches the map only after the whole session has been
/// persisted, so a failed save leaves memory and disk as they were.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    repository: SessionRepository,
}

impl SessionStore {
    /// Creates an empty store backed by `repository`.
    pub fn new(repository: SessionRepository) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            repository,
        }
    }

    /// Loads every persisted session into memory.
    ///
    /// # Returns
    ///
    /// The number of sessions loaded.
    pub async fn load_all(&self) -> Result<usize> {
        let loaded = self.repository.load_all().await?;
        let count = loaded.len();

        let mut sessions = self.sessions.write().await;
        for session in loaded {
            sessions.insert(session.id.clone(), session);
        }

        Ok(count)
    }

    /// Creates and persists a new session.
    ///
    /// # Arguments
    ///
    /// * `name` - The label; blank or missing names fall back to a dated default.
    /// * `owner_hint` - The caller's existing owner id, if it has one.
    ///
    /// # Returns
    ///
    /// The created `Session`. Its `owner_id` must be handed back to the caller.
    pub async fn create(&self, name: Option<String>, owner_hint: Option<String>) -> Result<Session> {
        let owner_id = owner_hint
            .filter(|hint| !hint.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let session = Session::new(name, owner_id);

        self.repository.save(&session).await?;
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        tracing::info!(
            "✅ Session created: {} (owner: {}, name: {:?})",
            session.id,
            session.owner_id,
            session.name
        );

        Ok(session)
    }

    /// Returns a snapshot of the session.
    pub async fn get(&self, session_id: &str) -> Result<Session> {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return Ok(session.clone());
        }

        let session = self
            .repository
            .load(session_id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        tracing::debug!("📂 Session {} rehydrated from disk", session_id);

        let mut sessions = self.sessions.write().await;
        let cached = sessions
            .entry(session_id.to_string())
            .or_insert(session);

        Ok(cached.clone())
    }

    /// Applies `mutate` to a copy of the session, persists the copy, and
    /// only then replaces the cached session with it.
    ///
    /// When `mutate` or the save fails the cached session is unchanged.
    /// Mutations are serialized by the map's write lock, which is held
    /// across the save.
    pub async fn update<F, T>(&self, session_id: &str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        // make sure the entry is cached before taking the write lock
        self.get(session_id).await?;

        let mut sessions = self.sessions.write().await;
        let mut draft = sessions
            .get(session_id)
            .cloned()
            .ok_or(AppError::SessionNotFound)?;

        let output = mutate(&mut draft)?;
        self.repository.save(&draft).await?;

        sessions.insert(session_id.to_string(), draft);
        Ok(output)
    }

    /// Renames the session; blank names leave it untouched.
    ///
    /// # Returns
    ///
    /// The name the session carries afterwards.
    pub async fn rename(&self, session_id: &str, new_name: &str) -> Result<String> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(self.get(session_id).await?.name);
        }

        let name = self
            .update(session_id, |session| {
                session.name = new_name.to_string();
                Ok(session.name.clone())
            })
            .await?;

        tracing::info!("✏️ Session {} renamed to {:?}", session_id, name);
        Ok(name)
    }

    /// Lists the sessions created by `owner_id`, newest first.
    pub async fn list_by_owner(&self, owner_id: Option<&str>) -> Vec<ProjectSummary> {
        let Some(owner_id) = owner_id else {
            return Vec::new();
        };

        let mut projects: Vec<ProjectSummary> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|session| session.owner_id == owner_id)
            .map(Session::summary)
            .collect();

        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects
    }

    /// Drops every cached session; persisted documents are untouched.
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}
