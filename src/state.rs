use crate::config::Config;
use crate::error::Result;
use crate::repositories::session::SessionRepository;
use crate::services::sessions::SessionStore;
use crate::validation::upload::UploadPolicy;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Every known session, mirrored to disk.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Creates the data and upload directories and loads every persisted
    /// session into memory.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = SessionRepository::new(&config.data_dir, config.atomic_writes);
        repository.ensure_dir().await?;
        tracing::info!("✅ Session directory ready: {}", repository.dir().display());

        tokio::fs::create_dir_all(&config.upload_dir).await?;
        tracing::info!("✅ Upload directory ready: {}", config.upload_dir.display());

        let sessions = SessionStore::new(repository);
        let loaded = sessions.load_all().await?;
        tracing::info!("✅ Loaded {} session(s) from disk", loaded);

        Ok(AppState {
            config: config.clone(),
            sessions,
        })
    }

    /// The upload limits derived from the configuration.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.config.max_file_size,
            max_files: self.config.max_files_per_upload,
        }
    }
}
