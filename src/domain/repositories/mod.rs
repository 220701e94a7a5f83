//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract the catalog relies on; the concrete
//! stores live in `crate::infrastructure`.
//!
//! # Available Repositories
//!
//! - [`MovieRepository`] - Movie CRUD, paginated listing and rating compare-and-set
//!
//! # Testing
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod movie_repository;

pub use movie_repository::{MovieRepository, PageRequest, SortDirection, SortField};

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
