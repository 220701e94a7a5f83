//! Core domain entities representing the catalog data model.
//!
//! Entities are plain data structures; the only rule they enforce themselves
//! is field validation on the write models.
//!
//! # Entity Types
//!
//! - [`Movie`] - A catalog record with a denormalized average rating
//! - [`MovieDetails`] - A movie composed with one user's rating (read model)
//! - [`UserRating`] - A single vote as reported by the rating service
//!
//! # Design Pattern
//!
//! Separate structs for writes:
//! - `NewMovie` - For creating new records
//! - `MovieUpdate` - For full replacement of the editable fields

pub mod movie;
pub mod movie_details;

pub use movie::{Movie, MovieUpdate, NewMovie};
pub use movie_details::{MovieDetails, UserRating};
