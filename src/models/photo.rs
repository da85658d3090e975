use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::vote::VoteRecord;

/// One uploaded image, owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique within the owning session.
    pub id: String,
    /// The server-assigned storage name.
    pub filename: String,
    /// The name the uploader supplied.
    pub original_name: String,
    /// The public path the bytes are served from.
    pub path: String,
    /// The size in bytes.
    pub size: u64,
    /// The detected or declared media type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// When the photo was recorded.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// A photo with its derived tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResult {
    #[serde(flatten)]
    pub photo: Photo,
    pub upvotes: usize,
    pub downvotes: usize,
    pub score: i64,
}

impl PhotoResult {
    /// Combines a photo with its vote record, if one exists.
    pub fn new(photo: Photo, record: Option<&VoteRecord>) -> Self {
        let (upvotes, downvotes, score) = record
            .map(|r| (r.upvotes.len(), r.downvotes.len(), r.score()))
            .unwrap_or((0, 0, 0));

        Self {
            photo,
            upvotes,
            downvotes,
            score,
        }
    }
}
