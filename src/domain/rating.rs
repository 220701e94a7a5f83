//! Incremental average-rating aggregation.
//!
//! The catalog never stores individual votes; it keeps a running mean and a
//! vote counter. [`RatingSnapshot::apply`] computes the next pair from the
//! current one and a [`RatingEvent`]. It is pure: persisting the result and
//! serializing concurrent updates of the same movie are the caller's job
//! (see [`crate::application::services::MovieService::update_rating`]).

use serde_json::json;

use crate::error::AppError;

/// A rating contribution for one movie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingEvent {
    /// A user rated the movie for the first time.
    NewVote { rating: f64 },
    /// A user changed an earlier rating from `old_rating` to `new_rating`.
    Correction { new_rating: f64, old_rating: f64 },
}

/// The `(average_rating, scores)` pair of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSnapshot {
    pub average_rating: f64,
    pub scores: i32,
}

impl RatingSnapshot {
    /// Applies `event` and returns the next snapshot.
    ///
    /// - New vote: `(avg * scores + r) / (scores + 1)`, counter incremented.
    /// - Correction: `(avg * scores - old + new) / scores`, counter unchanged.
    ///
    /// No rounding and no clamping happen here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidAggregationState`] when a correction targets
    /// a snapshot with zero votes, or when the vote counter would overflow.
    pub fn apply(self, event: RatingEvent) -> Result<Self, AppError> {
        let total = self.average_rating * f64::from(self.scores);

        match event {
            RatingEvent::NewVote { rating } => {
                let scores = self.scores.checked_add(1).ok_or_else(|| {
                    AppError::invalid_aggregation_state(
                        "Vote counter overflow",
                        json!({ "scores": self.scores }),
                    )
                })?;

                Ok(Self {
                    average_rating: (total + rating) / f64::from(scores),
                    scores,
                })
            }
            RatingEvent::Correction {
                new_rating,
                old_rating,
            } => {
                if self.scores <= 0 {
                    return Err(AppError::invalid_aggregation_state(
                        "Cannot correct a rating of a movie without votes",
                        json!({ "scores": self.scores }),
                    ));
                }

                Ok(Self {
                    average_rating: (total - old_rating + new_rating) / f64::from(self.scores),
                    scores: self.scores,
                })
            }
        }
    }
}
