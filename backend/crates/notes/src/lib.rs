//! Notes Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Note entity, repository trait
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, request gate
//!
//! ## Rate limiting model
//! - Every mutating route (create/update/delete) passes through the request
//!   gate before any validation or persistence work
//! - The read route is deliberately ungated
//! - Rejections are uniform: 429 with `{"error":"too many requests"}`,
//!   whether the budget is spent, the caller has no resolvable identity,
//!   or the counter store is down

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{NotesError, NotesResult};
pub use infra::postgres::PgNoteRepository;
pub use presentation::router::{notes_router, notes_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
