//! Request Gate
//!
//! Middleware in front of every mutating route. It resolves the caller's
//! identity, asks the rate limiter for a decision, and short-circuits with
//! 429 before any validation or persistence work happens. An admitted
//! request passes through unmodified.

use crate::domain::repository::NoteRepository;
use crate::error::NotesError;
use crate::presentation::handlers::NotesAppState;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::client_identity;
use platform::rate_limit::CounterStore;
use std::net::SocketAddr;

/// Gate a mutating request on the rate limiter's decision.
///
/// Rejections look identical whether the budget is spent, the caller has no
/// resolvable identity, or the counter store failed.
pub async fn enforce_rate_limit<R, S>(
    State(state): State<NotesAppState<R, S>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
    S: CounterStore + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let identity = client_identity(req.headers(), direct_ip);

    if !state.limiter.allow(&identity).await {
        return Err(NotesError::RateLimited.into_response());
    }

    Ok(next.run(req).await)
}
