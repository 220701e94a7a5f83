//! Outbound integration with the rating service.
//!
//! - [`HttpRatingClient`] - reqwest-based implementation of
//!   [`crate::domain::gateways::RatingClient`]

pub mod http_rating_client;

pub use http_rating_client::HttpRatingClient;
