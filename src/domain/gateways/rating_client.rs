//! Client trait for the external rating service.

use crate::domain::entities::UserRating;
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to the rating service, which owns individual user votes.
///
/// # Implementations
///
/// - [`crate::infrastructure::rating::HttpRatingClient`] - HTTP/JSON client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingClient: Send + Sync {
    /// Fetches every rating a user has given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UpstreamUnavailable`] if the service cannot be
    /// reached, times out, answers with a non-success status, or returns a
    /// body that does not parse. An empty list is only returned when the
    /// service itself reports no ratings.
    async fn ratings_by_user(&self, user_id: i32) -> Result<Vec<UserRating>, AppError>;
}
