//! Notes Router

use crate::domain::repository::NoteRepository;
use crate::infra::postgres::PgNoteRepository;
use crate::presentation::handlers::{self, NotesAppState};
use crate::presentation::middleware::enforce_rate_limit;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use platform::rate_limit::{CounterStore, RateLimiter};
use platform::redis_store::RedisCounterStore;
use std::sync::Arc;

/// Create the notes router with the PostgreSQL repository and the
/// Redis-backed rate limiter
pub fn notes_router(
    repo: PgNoteRepository,
    limiter: RateLimiter<RedisCounterStore>,
) -> Router {
    notes_router_generic(repo, limiter)
}

/// Create a generic notes router for any repository and counter store
pub fn notes_router_generic<R, S>(repo: R, limiter: RateLimiter<S>) -> Router
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    let state = NotesAppState {
        repo: Arc::new(repo),
        limiter: Arc::new(limiter),
    };

    // Mutating routes sit behind the request gate; the read route does not.
    let gated = Router::new()
        .route("/createnotes", post(handlers::create_note::<R, S>))
        .route("/updatenotes", post(handlers::update_note::<R, S>))
        .route("/deletenotes", post(handlers::delete_note::<R, S>))
        .route_layer(from_fn_with_state(
            state.clone(),
            enforce_rate_limit::<R, S>,
        ));

    Router::new()
        .route("/notes", get(handlers::list_notes::<R, S>))
        .merge(gated)
        .with_state(state)
}
