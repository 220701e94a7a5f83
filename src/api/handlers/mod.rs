//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod movies;

pub use health::health_handler;
pub use movies::{
    add_movie_handler, count_movies_handler, delete_movie_handler, edit_movie_handler,
    get_movie_handler, list_movies_handler, update_avg_rating_handler, user_movies_handler,
};
