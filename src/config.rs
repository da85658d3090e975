use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{Context, Result};

/// The default per-file upload ceiling (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
/// The default number of files accepted in a single upload call.
pub const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 100;

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The directory holding one JSON document per session.
    pub data_dir: PathBuf,
    /// The directory uploaded photo bytes are written to.
    pub upload_dir: PathBuf,
    /// The static front-end served as the router fallback.
    pub public_dir: PathBuf,
    /// The per-file upload ceiling in bytes.
    pub max_file_size: usize,
    /// The maximum number of files accepted per upload call.
    pub max_files_per_upload: usize,
    /// Whether a vote may name a photo id the session does not contain.
    pub allow_votes_on_unknown_photos: bool,
    /// Whether session documents are written to a temp file and renamed into place.
    pub atomic_writes: bool,
    /// The lifetime of the owner cookie in days.
    pub owner_cookie_days: i64,
    /// Whether cookies are marked `Secure`.
    pub secure_cookies: bool,
    /// The origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Every key is optional; malformed values are rejected.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_addr: parse_var("BIND_ADDR", "127.0.0.1:3000")?,
            data_dir: PathBuf::from(var_or("DATA_DIR", "data/sessions")),
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "public/uploads")),
            public_dir: PathBuf::from(var_or("PUBLIC_DIR", "public")),
            max_file_size: parse_var("MAX_FILE_SIZE_BYTES", &DEFAULT_MAX_FILE_SIZE.to_string())?,
            max_files_per_upload: parse_var(
                "MAX_FILES_PER_UPLOAD",
                &DEFAULT_MAX_FILES_PER_UPLOAD.to_string(),
            )?,
            allow_votes_on_unknown_photos: parse_var("ALLOW_VOTES_ON_UNKNOWN_PHOTOS", "true")?,
            atomic_writes: parse_var("ATOMIC_WRITES", "false")?,
            owner_cookie_days: parse_var("OWNER_COOKIE_DAYS", "365")?,
            secure_cookies: var_or("APP_ENV", "development") == "production",
            cors_origins: var_or("CORS_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    /// A configuration rooted at `base`, used by tests and local tooling.
    pub fn with_base_dir(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: base.join("sessions"),
            upload_dir: base.join("public").join("uploads"),
            public_dir: base.join("public"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            allow_votes_on_unknown_photos: true,
            atomic_writes: false,
            owner_cookie_days: 365,
            secure_cookies: false,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }

    /// The largest request body the upload route can legitimately carry.
    pub fn body_limit(&self) -> usize {
        // multipart framing per part is small; 64 KiB each is generous
        self.max_files_per_upload
            .saturating_mul(self.max_file_size.saturating_add(64 * 1024))
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .parse()
        .with_context(|| format!("Invalid {}", key))
}
