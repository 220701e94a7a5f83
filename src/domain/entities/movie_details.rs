//! Read model joining a movie with one user's rating of it.

use super::Movie;

/// One `{movie_id, user_id, rating}` tuple owned by the rating service.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRating {
    pub movie_id: i32,
    pub user_id: i32,
    pub rating: f64,
}

/// A movie enriched with a single user's rating. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub user_id: i32,
    pub rating: f64,
}

impl MovieDetails {
    pub fn new(movie: Movie, user_id: i32, rating: f64) -> Self {
        Self {
            movie,
            user_id,
            rating,
        }
    }
}
