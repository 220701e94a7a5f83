//! API route configuration.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    add_movie_handler, count_movies_handler, delete_movie_handler, edit_movie_handler,
    get_movie_handler, list_movies_handler, update_avg_rating_handler, user_movies_handler,
};
use crate::state::AppState;

/// Movie catalog routes.
///
/// # Endpoints
///
/// - `POST   /movies/add`                     - Add a movie
/// - `GET    /movies`                         - List a page of movies
/// - `GET    /movies/count`                   - Number of movies
/// - `GET    /movies/{id}`                    - A single movie
/// - `GET    /movies/user/{id}`               - Movies rated by a user
/// - `PATCH  /movies/edit/{id}`               - Replace a movie's fields
/// - `PATCH  /movies/update-avg-rating/{id}`  - Fold a vote into the average
/// - `DELETE /movies/delete/{id}`             - Remove a movie
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies_handler))
        .route("/movies/add", post(add_movie_handler))
        .route("/movies/count", get(count_movies_handler))
        .route("/movies/{id}", get(get_movie_handler))
        .route("/movies/user/{id}", get(user_movies_handler))
        .route("/movies/edit/{id}", patch(edit_movie_handler))
        .route(
            "/movies/update-avg-rating/{id}",
            patch(update_avg_rating_handler),
        )
        .route("/movies/delete/{id}", delete(delete_movie_handler))
}
