//! DTOs for movie endpoints.
//!
//! JSON field names are camelCase (`releaseYear`, `averageRating`, ...).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Movie, MovieDetails, MovieUpdate, NewMovie};

/// Request body for `POST /movies/add` and `PATCH /movies/edit/{id}`.
///
/// `id`, `averageRating` and `scores` are not part of the request; if a
/// client sends them anyway they are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub release_year: i32,

    #[serde(default)]
    pub description: String,
}

impl MovieRequest {
    pub fn into_new_movie(self) -> NewMovie {
        NewMovie {
            title: self.title,
            release_year: self.release_year,
            description: self.description,
        }
    }

    pub fn into_update(self) -> MovieUpdate {
        MovieUpdate {
            title: self.title,
            release_year: self.release_year,
            description: self.description,
        }
    }
}

/// JSON representation of a movie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub average_rating: f64,
    pub scores: i32,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        MovieResponse {
            id: m.id,
            title: m.title,
            release_year: m.release_year,
            description: m.description,
            average_rating: m.average_rating,
            scores: m.scores,
        }
    }
}

/// A movie flattened together with one user's rating of it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub movie: MovieResponse,
    pub user_id: i32,
    pub rating: f64,
}

impl From<MovieDetails> for MovieDetailsResponse {
    fn from(d: MovieDetails) -> Self {
        MovieDetailsResponse {
            movie: d.movie.into(),
            user_id: d.user_id,
            rating: d.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_ignores_rating_fields() {
        let body = json!({
            "title": "Alien",
            "releaseYear": 1979,
            "averageRating": 10.0,
            "scores": 1000
        });
        let request: MovieRequest = serde_json::from_value(body).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.description, "");
        let new_movie = request.into_new_movie();
        assert_eq!(new_movie.title, "Alien");
        assert_eq!(new_movie.release_year, 1979);
    }

    #[test]
    fn test_request_validation() {
        let request: MovieRequest =
            serde_json::from_value(json!({ "title": "", "releaseYear": -3 })).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("release_year"));
    }

    #[test]
    fn test_details_response_is_flat() {
        let details = MovieDetails::new(
            Movie::new(4, "Tenet".to_string(), 2020, String::new(), 6.5, 2),
            8,
            7.0,
        );
        let value = serde_json::to_value(MovieDetailsResponse::from(details)).unwrap();

        assert_eq!(value["id"], 4);
        assert_eq!(value["releaseYear"], 2020);
        assert_eq!(value["averageRating"], 6.5);
        assert_eq!(value["userId"], 8);
        assert_eq!(value["rating"], 7.0);
    }
}
