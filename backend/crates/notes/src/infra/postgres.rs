//! PostgreSQL Repository Implementations

use crate::domain::entities::Note;
use crate::domain::repository::NoteRepository;
use crate::error::NotesResult;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NoteRepository for PgNoteRepository {
    async fn insert(&self, note: &Note) -> NotesResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notes (note_id, content, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(note.id)
        .bind(&note.content)
        .bind(note.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(note_id = %note.id, "Note created");

        Ok(())
    }

    async fn list(&self) -> NotesResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT note_id, content, created_at
            FROM notes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NoteRow::into_note).collect())
    }

    async fn update_content(&self, id: Uuid, content: &str) -> NotesResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE notes SET content = $2 WHERE note_id = $1
            "#,
        )
        .bind(id)
        .bind(content)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected > 0 {
            tracing::info!(note_id = %id, "Note updated");
        }

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> NotesResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM notes WHERE note_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected > 0 {
            tracing::info!(note_id = %id, "Note deleted");
        }

        Ok(rows_affected > 0)
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct NoteRow {
    note_id: Uuid,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl NoteRow {
    fn into_note(self) -> Note {
        Note {
            id: self.note_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
