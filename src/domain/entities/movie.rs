//! Movie entity and its write models.

use serde_json::json;

use crate::domain::rating::RatingSnapshot;
use crate::error::AppError;

/// A catalog record with a denormalized average rating.
///
/// `average_rating` is the mean of exactly `scores` votes recorded through
/// [`RatingSnapshot::apply`]; it is never written from client input.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub average_rating: f64,
    pub scores: i32,
}

impl Movie {
    /// Creates a new Movie instance.
    pub fn new(
        id: i32,
        title: String,
        release_year: i32,
        description: String,
        average_rating: f64,
        scores: i32,
    ) -> Self {
        Self {
            id,
            title,
            release_year,
            description,
            average_rating,
            scores,
        }
    }

    /// Returns the `(average_rating, scores)` pair of this movie.
    pub fn rating_snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            average_rating: self.average_rating,
            scores: self.scores,
        }
    }

    /// Returns a copy of this movie carrying `snapshot` as its rating.
    pub fn with_rating(mut self, snapshot: RatingSnapshot) -> Self {
        self.average_rating = snapshot.average_rating;
        self.scores = snapshot.scores;
        self
    }
}

/// Input data for creating a new movie.
///
/// Rating fields are absent on purpose: every new movie starts at `0 / 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_year: i32,
    pub description: String,
}

impl NewMovie {
    /// Checks the catalog invariants on title and release year.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank title or a negative year.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.title, self.release_year)
    }
}

/// Full replacement of the editable fields of a movie.
///
/// Carries no id and no rating fields, so an update can never touch them.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieUpdate {
    pub title: String,
    pub release_year: i32,
    pub description: String,
}

impl MovieUpdate {
    /// See [`NewMovie::validate`].
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.title, self.release_year)
    }
}

fn validate_fields(title: &str, release_year: i32) -> Result<(), AppError> {
    let mut message = String::new();
    let mut details = serde_json::Map::new();

    if title.trim().is_empty() {
        message.push_str("title - must not be empty;");
        details.insert("title".to_string(), json!(["must not be empty"]));
    }

    if release_year < 0 {
        message.push_str("releaseYear - must not be negative;");
        details.insert(
            "releaseYear".to_string(),
            json!(["must not be negative"]),
        );
    }

    if message.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(
            message,
            serde_json::Value::Object(details),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie::new(
            1,
            "Stalker".to_string(),
            1979,
            "A guide leads two men through the Zone".to_string(),
            8.5,
            4,
        )
    }

    #[test]
    fn test_movie_creation() {
        let movie = sample_movie();

        assert_eq!(movie.id, 1);
        assert_eq!(movie.title, "Stalker");
        assert_eq!(movie.release_year, 1979);
        assert_eq!(movie.scores, 4);
    }

    #[test]
    fn test_rating_snapshot_round_trip() {
        let movie = sample_movie();
        let snapshot = movie.rating_snapshot();
        assert_eq!(snapshot.average_rating, 8.5);
        assert_eq!(snapshot.scores, 4);

        let updated = movie.with_rating(RatingSnapshot {
            average_rating: 9.0,
            scores: 5,
        });
        assert_eq!(updated.average_rating, 9.0);
        assert_eq!(updated.scores, 5);
        assert_eq!(updated.title, "Stalker");
    }

    #[test]
    fn test_new_movie_validation() {
        let ok = NewMovie {
            title: "Solaris".to_string(),
            release_year: 1972,
            description: String::new(),
        };
        assert!(ok.validate().is_ok());

        let blank = NewMovie {
            title: "   ".to_string(),
            ..ok.clone()
        };
        assert!(matches!(
            blank.validate().unwrap_err(),
            AppError::Validation { .. }
        ));

        let negative = NewMovie {
            release_year: -1,
            ..ok
        };
        let err = negative.validate().unwrap_err();
        assert_eq!(err.to_string(), "releaseYear - must not be negative;");
    }

    #[test]
    fn test_movie_update_reports_every_field() {
        let update = MovieUpdate {
            title: String::new(),
            release_year: -5,
            description: "x".to_string(),
        };
        let err = update.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "title - must not be empty;releaseYear - must not be negative;"
        );
    }
}
