//! Domain layer containing business entities and logic.
//!
//! Defines the catalog entities, the rating aggregation rule, and the
//! contracts (traits) of the store and of the rating service, independent of
//! infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`rating`] - Incremental average-rating aggregation
//! - [`repositories`] - Data access trait definitions
//! - [`gateways`] - Outbound service trait definitions
//!
//! # Rating Update Flow
//!
//! 1. HTTP handler turns the request body into a [`rating::RatingEvent`]
//! 2. [`crate::application::services::MovieService`] locks the movie id
//! 3. The current [`rating::RatingSnapshot`] is read and the event applied
//! 4. The result is written with [`repositories::MovieRepository::compare_and_set_rating`]

pub mod entities;
pub mod gateways;
pub mod rating;
pub mod repositories;
