//! DTO for the average-rating update endpoint.

use serde::Deserialize;
use serde_json::json;

use crate::domain::rating::RatingEvent;
use crate::error::AppError;

/// Request body for `PATCH /movies/update-avg-rating/{id}`.
///
/// ```json
/// { "rating": 8.0, "isUpdate": true, "oldRating": 6.0 }
/// ```
///
/// `update` is accepted as an alias of `isUpdate`. Ratings are not range
/// checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRatingRequest {
    pub rating: f64,

    #[serde(default, alias = "update")]
    pub is_update: bool,

    #[serde(default)]
    pub old_rating: Option<f64>,
}

impl NewRatingRequest {
    /// Converts the request into a rating event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `isUpdate` is set without `oldRating`.
    pub fn into_event(self) -> Result<RatingEvent, AppError> {
        match (self.is_update, self.old_rating) {
            (false, _) => Ok(RatingEvent::NewVote {
                rating: self.rating,
            }),
            (true, Some(old_rating)) => Ok(RatingEvent::Correction {
                new_rating: self.rating,
                old_rating,
            }),
            (true, None) => Err(AppError::bad_request(
                "oldRating - must be provided when isUpdate is true;",
                json!({ "oldRating": ["must be provided when isUpdate is true"] }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: serde_json::Value) -> NewRatingRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_new_vote() {
        let event = parse(json!({ "rating": 7.0 })).into_event().unwrap();
        assert_eq!(event, RatingEvent::NewVote { rating: 7.0 });
    }

    #[test]
    fn test_correction_with_alias() {
        let event = parse(json!({ "rating": 7.0, "update": true, "oldRating": 2.0 }))
            .into_event()
            .unwrap();
        assert_eq!(
            event,
            RatingEvent::Correction {
                new_rating: 7.0,
                old_rating: 2.0
            }
        );
    }

    #[test]
    fn test_correction_requires_old_rating() {
        let err = parse(json!({ "rating": 7.0, "isUpdate": true }))
            .into_event()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_old_rating_ignored_for_new_vote() {
        let event = parse(json!({ "rating": 3.0, "isUpdate": false, "oldRating": 9.0 }))
            .into_event()
            .unwrap();
        assert_eq!(event, RatingEvent::NewVote { rating: 3.0 });
    }
}
