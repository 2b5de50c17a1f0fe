//! API DTOs (Data Transfer Objects)

use crate::domain::entities::Note;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /createnotes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub content: String,
}

/// Request for POST /updatenotes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub id: Uuid,
    pub content: String,
}

/// Request for POST /deletenotes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteRequest {
    pub id: Uuid,
}

/// Note representation returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NoteResponse {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            content: note.content.clone(),
            created_at: note.created_at,
        }
    }
}
