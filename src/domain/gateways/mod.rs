//! Traits for collaborators the catalog calls over the network.

pub mod rating_client;

pub use rating_client::RatingClient;

#[cfg(test)]
pub use rating_client::MockRatingClient;
