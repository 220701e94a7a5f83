//! HTTP client for the external rating service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::domain::entities::UserRating;
use crate::domain::gateways::RatingClient;
use crate::error::AppError;

/// Wire format of `GET /ratings/user/{id}`.
#[derive(Debug, Deserialize)]
struct RatingsResponse {
    ratings: Vec<RatingDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingDto {
    movie_id: i32,
    user_id: i32,
    rating: f64,
}

impl From<RatingDto> for UserRating {
    fn from(dto: RatingDto) -> Self {
        UserRating {
            movie_id: dto.movie_id,
            user_id: dto.user_id,
            rating: dto.rating,
        }
    }
}

/// Calls the rating service over HTTP/JSON.
///
/// Every request is bounded by the configured timeout. There is no retry:
/// a failed call fails the enclosing catalog request.
#[derive(Debug, Clone)]
pub struct HttpRatingClient {
    client: Client,
    base_url: String,
}

impl HttpRatingClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("movie-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::internal(
                    "Failed to create HTTP client",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn upstream_error(url: &str, reason: impl ToString) -> AppError {
        metrics::counter!("rating_service_failures_total").increment(1);
        let reason = reason.to_string();
        tracing::warn!(url = %url, reason = %reason, "Rating service call failed");
        AppError::upstream_unavailable(
            "Rating service unavailable",
            json!({ "url": url, "reason": reason }),
        )
    }
}

#[async_trait]
impl RatingClient for HttpRatingClient {
    async fn ratings_by_user(&self, user_id: i32) -> Result<Vec<UserRating>, AppError> {
        let url = format!("{}/ratings/user/{}", self.base_url, user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::upstream_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::upstream_error(&url, format!("status {}", status)));
        }

        let body = response
            .json::<RatingsResponse>()
            .await
            .map_err(|e| Self::upstream_error(&url, e))?;

        tracing::debug!(user_id, count = body.ratings.len(), "Fetched user ratings");

        Ok(body.ratings.into_iter().map(UserRating::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpRatingClient::new("http://ratings:8081/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://ratings:8081");
    }

    #[test]
    fn test_ratings_response_parses_camel_case() {
        let body = r#"{"ratings":[{"ratingId":3,"movieId":7,"userId":2,"rating":8.5}]}"#;
        let parsed: RatingsResponse = serde_json::from_str(body).unwrap();
        let ratings: Vec<UserRating> = parsed.ratings.into_iter().map(UserRating::from).collect();

        assert_eq!(
            ratings,
            vec![UserRating {
                movie_id: 7,
                user_id: 2,
                rating: 8.5
            }]
        );
    }

    #[test]
    fn test_null_ratings_is_malformed() {
        assert!(serde_json::from_str::<RatingsResponse>(r#"{"ratings":null}"#).is_err());
        assert!(serde_json::from_str::<RatingsResponse>("null").is_err());
    }
}
