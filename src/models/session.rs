use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{photo::Photo, vote::VoteRecord};

/// Represents one photo-voting project.
///
/// `photos` keeps upload order; entries in `votes` are created on the first
/// vote cast for a photo id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The unique identifier for the session.
    pub id: String,
    /// The human-readable label.
    pub name: String,
    /// The soft identity that created the session.
    pub owner_id: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The uploaded photos, in upload order.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Vote records keyed by photo id.
    #[serde(default)]
    pub votes: HashMap<String, VoteRecord>,
}

impl Session {
    /// Creates an empty session with a fresh id.
    ///
    /// A missing or blank `name` falls back to one derived from the creation date.
    pub fn new(name: Option<String>, owner_id: String) -> Self {
        let created_at = Utc::now();
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(&created_at));

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            owner_id,
            created_at,
            photos: Vec::new(),
            votes: HashMap::new(),
        }
    }

    /// Returns `true` if a photo with `photo_id` was uploaded to this session.
    pub fn has_photo(&self, photo_id: &str) -> bool {
        self.photos.iter().any(|p| p.id == photo_id)
    }

    /// The number of stances recorded across all photos.
    pub fn vote_count(&self) -> usize {
        self.votes.values().map(VoteRecord::total).sum()
    }

    /// The listing view of this session.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            photo_count: self.photos.len(),
            vote_count: self.vote_count(),
        }
    }
}

/// One row of an owner's project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub photo_count: usize,
    pub vote_count: usize,
}

fn default_name(created_at: &DateTime<Utc>) -> String {
    format!("Project {}", created_at.format("%Y-%m-%d"))
}
