//! Domain Entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Note entity - the document protected by the rate limiter
#[derive(Debug, Clone)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note with a fresh id and the current timestamp
    pub fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: Utc::now(),
        }
    }
}
