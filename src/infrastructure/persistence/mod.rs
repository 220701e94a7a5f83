//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and explicit transactions for multi-statement writes.
//!
//! # Repositories
//!
//! - [`PgMovieRepository`] - Movie storage, listing and rating compare-and-set

pub mod pg_movie_repository;

pub use pg_movie_repository::PgMovieRepository;
