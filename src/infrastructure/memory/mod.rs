//! In-process storage for single-node deployments and tests.
//!
//! Selected with `STORE_BACKEND=memory`. Per-movie rating updates are
//! serialized by the service's keyed locks; the store's own lock makes each
//! call atomic.

pub mod in_memory_movie_repository;

pub use in_memory_movie_repository::InMemoryMovieRepository;
