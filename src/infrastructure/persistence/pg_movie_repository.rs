//! PostgreSQL implementation of movie repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Movie, MovieUpdate, NewMovie};
use crate::domain::rating::RatingSnapshot;
use crate::domain::repositories::{MovieRepository, PageRequest, SortDirection, SortField};
use crate::error::AppError;

const MOVIE_COLUMNS: &str = "id, title, release_year, description, average_rating, scores";

#[derive(Debug, FromRow)]
struct MovieRow {
    id: i32,
    title: String,
    release_year: i32,
    description: String,
    average_rating: f64,
    scores: i32,
}

impl From<MovieRow> for Movie {
    fn from(r: MovieRow) -> Self {
        Movie::new(
            r.id,
            r.title,
            r.release_year,
            r.description,
            r.average_rating,
            r.scores,
        )
    }
}

fn order_by(sort: SortField, direction: SortDirection) -> String {
    let column = match sort {
        SortField::AverageRating => "average_rating",
        SortField::ReleaseYear => "release_year",
        SortField::Title => "title",
    };
    let direction = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    format!("ORDER BY {column} {direction}, id ASC")
}

/// PostgreSQL repository for the movie catalog.
///
/// Uses bound parameters for every value; the only interpolated SQL is the
/// `ORDER BY` clause, built from the closed [`SortField`] enum.
pub struct PgMovieRepository {
    pool: Arc<PgPool>,
}

impl PgMovieRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn create(&self, new_movie: NewMovie) -> Result<Movie, AppError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            INSERT INTO movies (title, release_year, description)
            VALUES ($1, $2, $3)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(new_movie.title)
        .bind(new_movie.release_year)
        .bind(new_movie.description)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, AppError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Movie::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Movie>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn update(&self, id: i32, update: MovieUpdate) -> Result<Option<Movie>, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            UPDATE movies SET
                title        = $2,
                release_year = $3,
                description  = $4
            WHERE id = $1
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.title)
        .bind(update.release_year)
        .bind(update.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_page(&self, request: PageRequest) -> Result<Vec<Movie>, AppError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            SELECT {MOVIE_COLUMNS}
            FROM movies
            {}
            LIMIT $1 OFFSET $2
            "#,
            order_by(request.sort, request.direction)
        ))
        .bind(request.limit)
        .bind(request.offset())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn compare_and_set_rating(
        &self,
        id: i32,
        expected: RatingSnapshot,
        next: RatingSnapshot,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE movies SET
                average_rating = $4,
                scores         = $5
            WHERE id = $1 AND average_rating = $2 AND scores = $3
            "#,
        )
        .bind(id)
        .bind(expected.average_rating)
        .bind(expected.scores)
        .bind(next.average_rating)
        .bind(next.scores)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
