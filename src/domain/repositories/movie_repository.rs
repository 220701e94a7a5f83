//! Repository trait for movie storage.

use crate::domain::entities::{Movie, MovieUpdate, NewMovie};
use crate::domain::rating::RatingSnapshot;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

/// Column a page of movies is ordered by. Ties are always broken by id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    AverageRating,
    ReleaseYear,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A validated page request: `page` is 0-indexed, `limit` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Number of records preceding this page in the full ordering.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.limit)
    }
}

/// Repository interface for the movie catalog.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMovieRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryMovieRepository`] - single-node in-memory store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_movie.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Inserts a movie. The store assigns the id; rating fields start at `0 / 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_movie: NewMovie) -> Result<Movie, AppError>;

    /// Finds a movie by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Movie))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, AppError>;

    /// Returns every movie whose id is in `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Movie>, AppError>;

    /// Replaces title, release year and description of a movie.
    ///
    /// Rating fields are left untouched.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no movie has this id.
    async fn update(&self, id: i32, update: MovieUpdate) -> Result<Option<Movie>, AppError>;

    /// Deletes a movie.
    ///
    /// Returns `Ok(true)` if a movie was removed, `Ok(false)` if none existed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    /// Counts all movies.
    async fn count(&self) -> Result<i64, AppError>;

    /// Returns one page of the catalog ordered by `request.sort`.
    ///
    /// A page past the end is empty.
    async fn list_page(&self, request: PageRequest) -> Result<Vec<Movie>, AppError>;

    /// Atomically replaces the rating of a movie if it still equals `expected`.
    ///
    /// Returns `Ok(false)` if the movie is gone or its rating changed since
    /// `expected` was read.
    async fn compare_and_set_rating(
        &self,
        id: i32,
        expected: RatingSnapshot,
        next: RatingSnapshot,
    ) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        let request = PageRequest {
            page: 3,
            limit: 20,
            sort: SortField::AverageRating,
            direction: SortDirection::Desc,
        };
        assert_eq!(request.offset(), 60);
    }

    #[test]
    fn test_page_offset_saturates() {
        let request = PageRequest {
            page: i64::MAX,
            limit: 2,
            sort: SortField::Title,
            direction: SortDirection::Asc,
        };
        assert_eq!(request.offset(), i64::MAX);
    }

    #[test]
    fn test_sort_field_deserializes_camel_case() {
        let field: SortField = serde_json::from_str("\"releaseYear\"").unwrap();
        assert_eq!(field, SortField::ReleaseYear);
        assert_eq!(SortField::default(), SortField::AverageRating);
    }
}
