//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! rating-service calls, validation, and business rules. Services consume
//! domain traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::movie_service::MovieService`] - Catalog CRUD, listing and rating aggregation

pub mod services;
