//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete storage backends and the rating-service client.
//!
//! # Modules
//!
//! - [`memory`] - In-process movie store
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rating`] - HTTP client for the rating service

pub mod memory;
pub mod persistence;
pub mod rating;
