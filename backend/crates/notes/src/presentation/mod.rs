//! Presentation Layer
//!
//! HTTP handlers, DTOs and the request gate for the API.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
