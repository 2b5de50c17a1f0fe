//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::Note;
use crate::error::NotesResult;
use uuid::Uuid;

/// Note repository trait
#[trait_variant::make(NoteRepository: Send)]
pub trait LocalNoteRepository {
    /// Persist a new note
    async fn insert(&self, note: &Note) -> NotesResult<()>;

    /// List all notes, newest first
    async fn list(&self) -> NotesResult<Vec<Note>>;

    /// Replace the content of an existing note.
    /// Returns false if no note with that id exists.
    async fn update_content(&self, id: Uuid, content: &str) -> NotesResult<bool>;

    /// Delete a note. Returns false if no note with that id exists.
    async fn delete(&self, id: Uuid) -> NotesResult<bool>;
}
