//! Infrastructure Layer - Repository implementations

pub mod postgres;
