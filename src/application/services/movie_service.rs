//! Catalog use cases: CRUD, paginated listing and rating aggregation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Movie, MovieDetails, MovieUpdate, NewMovie};
use crate::domain::gateways::RatingClient;
use crate::domain::rating::RatingEvent;
use crate::domain::repositories::{MovieRepository, PageRequest, SortDirection, SortField};
use crate::error::AppError;
use crate::utils::keyed_lock::KeyedLocks;
use serde_json::json;

/// Default number of compare-and-set attempts for one rating update.
pub const DEFAULT_RATING_RETRIES: u32 = 5;

/// Service orchestrating the movie store, the rating aggregator and the
/// rating service.
///
/// Rating updates of the same movie are serialized in-process by a keyed
/// lock and guarded across processes by the store's compare-and-set, so no
/// two concurrent votes can both build on the same snapshot.
pub struct MovieService<R: MovieRepository + ?Sized, C: RatingClient + ?Sized> {
    repository: Arc<R>,
    rating_client: Arc<C>,
    rating_locks: KeyedLocks<i32>,
    max_rating_retries: u32,
}

impl<R: MovieRepository + ?Sized, C: RatingClient + ?Sized> MovieService<R, C> {
    /// Creates a new movie service.
    pub fn new(repository: Arc<R>, rating_client: Arc<C>) -> Self {
        Self {
            repository,
            rating_client,
            rating_locks: KeyedLocks::new(),
            max_rating_retries: DEFAULT_RATING_RETRIES,
        }
    }

    /// Sets how many times a rating update re-reads the movie after losing a
    /// compare-and-set race. At least one attempt is always made.
    pub fn with_max_rating_retries(mut self, retries: u32) -> Self {
        self.max_rating_retries = retries.max(1);
        self
    }

    /// Adds a movie to the catalog with an empty rating.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank title or a negative year.
    pub async fn save(&self, new_movie: NewMovie) -> Result<Movie, AppError> {
        new_movie.validate()?;

        let movie = self.repository.create(new_movie).await?;
        tracing::info!(movie_id = movie.id, title = %movie.title, "Movie created");

        Ok(movie)
    }

    /// Retrieves a movie by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no movie has this id.
    pub async fn find_one(&self, id: i32) -> Result<Movie, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Movie not found", json!({ "id": id })))
    }

    /// Replaces title, release year and description of a movie.
    ///
    /// The stored average rating and vote count are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid fields and
    /// [`AppError::NotFound`] if no movie has this id.
    pub async fn update(&self, id: i32, update: MovieUpdate) -> Result<Movie, AppError> {
        update.validate()?;

        let movie = self
            .repository
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("Movie not found", json!({ "id": id })))?;
        tracing::info!(movie_id = id, "Movie updated");

        Ok(movie)
    }

    /// Removes a movie. Removing a missing movie is not an error.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let removed = self.repository.delete(id).await?;
        tracing::info!(movie_id = id, removed, "Movie delete requested");
        Ok(())
    }

    /// Counts the movies in the catalog.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Returns page `page` (0-indexed) of `limit` movies ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page < 0` or `limit < 1`.
    pub async fn list_paginated(
        &self,
        page: i64,
        limit: i64,
        descending: bool,
        sort: SortField,
    ) -> Result<Vec<Movie>, AppError> {
        if page < 0 {
            return Err(AppError::bad_request(
                "page - must not be negative;",
                json!({ "page": page }),
            ));
        }
        if limit < 1 {
            return Err(AppError::bad_request(
                "limit - must be at least 1;",
                json!({ "limit": limit }),
            ));
        }

        let direction = if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        self.repository
            .list_page(PageRequest {
                page,
                limit,
                sort,
                direction,
            })
            .await
    }

    /// Applies a vote or a vote correction to a movie's average rating.
    ///
    /// The read-modify-write runs while holding the movie's lock; if another
    /// process changed the rating in between, the movie is re-read and the
    /// event applied again, up to the configured number of attempts.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no movie has this id
    /// - [`AppError::InvalidAggregationState`] for a correction on a movie
    ///   without votes; nothing is written
    /// - [`AppError::Conflict`] if every compare-and-set attempt lost
    pub async fn update_rating(&self, id: i32, event: RatingEvent) -> Result<Movie, AppError> {
        let _guard = self.rating_locks.lock(id).await;

        for attempt in 1..=self.max_rating_retries {
            let movie = self.find_one(id).await?;
            let current = movie.rating_snapshot();
            let next = current.apply(event)?;

            if self
                .repository
                .compare_and_set_rating(id, current, next)
                .await?
            {
                metrics::counter!("movie_rating_updates_total").increment(1);
                tracing::info!(
                    movie_id = id,
                    average_rating = next.average_rating,
                    scores = next.scores,
                    "Movie rating updated"
                );
                return Ok(movie.with_rating(next));
            }

            metrics::counter!("movie_rating_conflicts_total").increment(1);
            tracing::warn!(movie_id = id, attempt, "Rating changed concurrently, retrying");
        }

        Err(AppError::conflict(
            "Rating was modified concurrently",
            json!({ "id": id, "attempts": self.max_rating_retries }),
        ))
    }

    /// Lists the movies a user has rated, each with that user's rating.
    ///
    /// Ratings referring to movies that no longer exist are dropped. The
    /// output follows the order of the rating service's answer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UpstreamUnavailable`] if the rating service fails.
    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<MovieDetails>, AppError> {
        let ratings = self.rating_client.ratings_by_user(user_id).await?;
        if ratings.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<i32> = ratings.iter().map(|r| r.movie_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let movies: HashMap<i32, Movie> = self
            .repository
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let total = ratings.len();
        let details: Vec<MovieDetails> = ratings
            .into_iter()
            .filter_map(|r| {
                movies
                    .get(&r.movie_id)
                    .map(|m| MovieDetails::new(m.clone(), r.user_id, r.rating))
            })
            .collect();

        if details.len() < total {
            tracing::debug!(
                user_id,
                dropped = total - details.len(),
                "Dropped ratings of deleted movies"
            );
        }

        Ok(details)
    }
}
