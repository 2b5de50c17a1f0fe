//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client identity resolution
//! - Rate limiting core and counter-store abstraction
//! - Redis-backed counter store

pub mod client;
pub mod rate_limit;
pub mod redis_store;
