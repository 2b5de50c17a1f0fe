//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - The Note entity
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
