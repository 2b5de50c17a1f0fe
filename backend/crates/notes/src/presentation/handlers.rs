//! HTTP Handlers

use crate::domain::entities::Note;
use crate::domain::repository::NoteRepository;
use crate::error::{NotesError, NotesResult};
use crate::presentation::dto::{
    CreateNoteRequest, DeleteNoteRequest, NoteResponse, UpdateNoteRequest,
};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use platform::rate_limit::{CounterStore, RateLimiter};
use std::sync::Arc;

/// Shared state for notes handlers
///
/// Built once at startup and handed to the router; nothing here is
/// process-global.
#[derive(Clone)]
pub struct NotesAppState<R, S>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub limiter: Arc<RateLimiter<S>>,
}

/// POST /createnotes (behind the request gate)
pub async fn create_note<R, S>(
    State(state): State<NotesAppState<R, S>>,
    Json(req): Json<CreateNoteRequest>,
) -> NotesResult<impl IntoResponse>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    if req.content.trim().is_empty() {
        return Err(NotesError::EmptyContent);
    }

    let note = Note::new(req.content);
    state.repo.insert(&note).await?;

    Ok((StatusCode::CREATED, Json(NoteResponse::from_note(&note))))
}

/// GET /notes (deliberately ungated)
pub async fn list_notes<R, S>(
    State(state): State<NotesAppState<R, S>>,
) -> NotesResult<Json<Vec<NoteResponse>>>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    let notes = state.repo.list().await?;

    Ok(Json(notes.iter().map(NoteResponse::from_note).collect()))
}

/// POST /updatenotes (behind the request gate)
pub async fn update_note<R, S>(
    State(state): State<NotesAppState<R, S>>,
    Json(req): Json<UpdateNoteRequest>,
) -> NotesResult<impl IntoResponse>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    if req.content.trim().is_empty() {
        return Err(NotesError::EmptyContent);
    }

    let updated = state.repo.update_content(req.id, &req.content).await?;
    if !updated {
        return Err(NotesError::NoteNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /deletenotes (behind the request gate)
pub async fn delete_note<R, S>(
    State(state): State<NotesAppState<R, S>>,
    Json(req): Json<DeleteNoteRequest>,
) -> NotesResult<impl IntoResponse>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    let deleted = state.repo.delete(req.id).await?;
    if !deleted {
        return Err(NotesError::NoteNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
