//! Handlers for the `/movies` endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::movie::{MovieDetailsResponse, MovieRequest, MovieResponse};
use crate::api::dto::pagination::ListMoviesParams;
use crate::api::dto::rating::NewRatingRequest;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Adds a movie to the catalog.
///
/// # Endpoint
///
/// `POST /movies/add`
///
/// # Request Body
///
/// ```json
/// { "title": "Alien", "releaseYear": 1979, "description": "In space..." }
/// ```
///
/// The new movie starts with `averageRating = 0` and `scores = 0`.
///
/// # Errors
///
/// Returns 400 Bad Request with a `field - message;` list if validation fails.
pub async fn add_movie_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    payload.validate()?;

    let movie = state.movie_service.save(payload.into_new_movie()).await?;

    Ok(Json(movie.into()))
}

/// Lists one page of movies.
///
/// # Endpoint
///
/// `GET /movies?page=0&limit=10&down=true&sort=averageRating`
///
/// `page` is 0-indexed and required. `limit` defaults to 10, `down`
/// (descending) to `true`, `sort` to `averageRating`. Ties are ordered by id.
pub async fn list_movies_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListMoviesParams>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let query = params.resolve()?;

    let movies = state
        .movie_service
        .list_paginated(query.page, query.limit, query.descending, query.sort)
        .await?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// `GET /movies/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the movie doesn't exist.
pub async fn get_movie_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.movie_service.find_one(id).await?;
    Ok(Json(movie.into()))
}

/// Lists the movies a user has rated together with the user's rating.
///
/// # Endpoint
///
/// `GET /movies/user/{id}`
///
/// # Errors
///
/// Returns 502 Bad Gateway if the rating service is unavailable.
pub async fn user_movies_handler(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
) -> Result<Json<Vec<MovieDetailsResponse>>, AppError> {
    let details = state.movie_service.list_by_user(user_id).await?;

    Ok(Json(
        details.into_iter().map(MovieDetailsResponse::from).collect(),
    ))
}

/// Replaces title, release year and description of a movie.
///
/// # Endpoint
///
/// `PATCH /movies/edit/{id}`
///
/// Rating fields in the body are ignored.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails and 404 Not Found if the
/// movie doesn't exist.
pub async fn edit_movie_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    payload.validate()?;

    let movie = state.movie_service.update(id, payload.into_update()).await?;

    Ok(Json(movie.into()))
}

/// Folds one vote, or the correction of an earlier vote, into the movie's
/// average rating.
///
/// # Endpoint
///
/// `PATCH /movies/update-avg-rating/{id}`
///
/// # Request Body
///
/// ```json
/// { "rating": 8.0, "isUpdate": true, "oldRating": 6.0 }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if `isUpdate` is true and `oldRating` is missing
/// - 404 Not Found if the movie doesn't exist
/// - 409 Conflict if the rating kept changing concurrently
/// - 500 with code `invalid_aggregation_state` for a correction on a movie
///   without votes
pub async fn update_avg_rating_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<NewRatingRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    let event = payload.into_event()?;

    let movie = state.movie_service.update_rating(id, event).await?;

    Ok(Json(movie.into()))
}

/// `DELETE /movies/delete/{id}`
///
/// Always answers 200, whether or not the movie existed.
pub async fn delete_movie_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(), AppError> {
    state.movie_service.delete(id).await
}

/// `GET /movies/count`, answered with a bare JSON integer.
pub async fn count_movies_handler(State(state): State<AppState>) -> Result<Json<i64>, AppError> {
    Ok(Json(state.movie_service.count().await?))
}
