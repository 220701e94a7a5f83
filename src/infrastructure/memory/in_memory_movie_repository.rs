//! In-memory implementation of the movie repository.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::entities::{Movie, MovieUpdate, NewMovie};
use crate::domain::rating::RatingSnapshot;
use crate::domain::repositories::{MovieRepository, PageRequest, SortDirection, SortField};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Inner {
    movies: BTreeMap<i32, Movie>,
    last_id: i32,
}

/// Single-node movie store backed by a `BTreeMap`.
///
/// Every operation runs under one `RwLock`, so each call is atomic on its own.
/// Data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    inner: RwLock<Inner>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Movie, b: &Movie, sort: SortField, direction: SortDirection) -> Ordering {
    let by_field = match sort {
        SortField::AverageRating => a.average_rating.total_cmp(&b.average_rating),
        SortField::ReleaseYear => a.release_year.cmp(&b.release_year),
        SortField::Title => a.title.cmp(&b.title),
    };

    let by_field = match direction {
        SortDirection::Asc => by_field,
        SortDirection::Desc => by_field.reverse(),
    };

    by_field.then(a.id.cmp(&b.id))
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn create(&self, new_movie: NewMovie) -> Result<Movie, AppError> {
        let mut inner = self.inner.write().await;

        let id = inner.last_id.checked_add(1).ok_or_else(|| {
            AppError::internal("Movie id sequence exhausted", serde_json::json!({}))
        })?;
        inner.last_id = id;

        let movie = Movie::new(
            id,
            new_movie.title,
            new_movie.release_year,
            new_movie.description,
            0.0,
            0,
        );
        inner.movies.insert(id, movie.clone());

        Ok(movie)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, AppError> {
        Ok(self.inner.read().await.movies.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Movie>, AppError> {
        let inner = self.inner.read().await;
        let wanted: HashSet<i32> = ids.iter().copied().collect();

        Ok(wanted
            .into_iter()
            .filter_map(|id| inner.movies.get(&id).cloned())
            .collect())
    }

    async fn update(&self, id: i32, update: MovieUpdate) -> Result<Option<Movie>, AppError> {
        let mut inner = self.inner.write().await;

        Ok(inner.movies.get_mut(&id).map(|movie| {
            movie.title = update.title;
            movie.release_year = update.release_year;
            movie.description = update.description;
            movie.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.inner.write().await.movies.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.movies.len() as i64)
    }

    async fn list_page(&self, request: PageRequest) -> Result<Vec<Movie>, AppError> {
        let inner = self.inner.read().await;

        let mut movies: Vec<&Movie> = inner.movies.values().collect();
        movies.sort_by(|a, b| compare(a, b, request.sort, request.direction));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);

        Ok(movies
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn compare_and_set_rating(
        &self,
        id: i32,
        expected: RatingSnapshot,
        next: RatingSnapshot,
    ) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;

        match inner.movies.get_mut(&id) {
            Some(movie) if movie.rating_snapshot() == expected => {
                movie.average_rating = next.average_rating;
                movie.scores = next.scores;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            release_year: 2000,
            description: String::new(),
        }
    }

    async fn seed_rated(repo: &InMemoryMovieRepository, ratings: &[f64]) -> Vec<i32> {
        let mut ids = Vec::new();
        for (i, &rating) in ratings.iter().enumerate() {
            let movie = repo.create(new_movie(&format!("m{}", i))).await.unwrap();
            repo.compare_and_set_rating(
                movie.id,
                RatingSnapshot::default(),
                RatingSnapshot {
                    average_rating: rating,
                    scores: 1,
                },
            )
            .await
            .unwrap();
            ids.push(movie.id);
        }
        ids
    }

    fn page(page: i64, limit: i64, direction: SortDirection) -> PageRequest {
        PageRequest {
            page,
            limit,
            sort: SortField::AverageRating,
            direction,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryMovieRepository::new();
        let a = repo.create(new_movie("a")).await.unwrap();
        let b = repo.create(new_movie("b")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.average_rating, 0.0);
        assert_eq!(a.scores, 0);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryMovieRepository::new();
        let a = repo.create(new_movie("a")).await.unwrap();
        assert!(repo.delete(a.id).await.unwrap());
        assert!(!repo.delete(a.id).await.unwrap());

        let b = repo.create(new_movie("b")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_list_page_descending_with_spill_over() {
        let repo = InMemoryMovieRepository::new();
        seed_rated(&repo, &[3.0, 7.0, 5.0]).await;

        let first = repo.list_page(page(0, 2, SortDirection::Desc)).await.unwrap();
        let ids: Vec<i32> = first.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let second = repo.list_page(page(1, 2, SortDirection::Desc)).await.unwrap();
        let ids: Vec<i32> = second.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);

        let past_end = repo.list_page(page(5, 2, SortDirection::Desc)).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_list_page_ties_broken_by_id() {
        let repo = InMemoryMovieRepository::new();
        seed_rated(&repo, &[5.0, 5.0, 9.0, 5.0]).await;

        let desc = repo.list_page(page(0, 10, SortDirection::Desc)).await.unwrap();
        let ids: Vec<i32> = desc.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);

        let asc = repo.list_page(page(0, 10, SortDirection::Asc)).await.unwrap();
        let ids: Vec<i32> = asc.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[tokio::test]
    async fn test_list_page_by_title() {
        let repo = InMemoryMovieRepository::new();
        for title in ["Mirror", "Andrei Rublev", "Nostalghia"] {
            repo.create(new_movie(title)).await.unwrap();
        }

        let request = PageRequest {
            page: 0,
            limit: 10,
            sort: SortField::Title,
            direction: SortDirection::Asc,
        };
        let titles: Vec<String> = repo
            .list_page(request)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Andrei Rublev", "Mirror", "Nostalghia"]);
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_missing() {
        let repo = InMemoryMovieRepository::new();
        let ids = seed_rated(&repo, &[1.0, 2.0]).await;

        let mut found: Vec<i32> = repo
            .find_by_ids(&[ids[0], 99, ids[1], ids[0]])
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        found.sort();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn test_update_keeps_rating() {
        let repo = InMemoryMovieRepository::new();
        let ids = seed_rated(&repo, &[6.5]).await;

        let updated = repo
            .update(
                ids[0],
                MovieUpdate {
                    title: "Renamed".to_string(),
                    release_year: 1999,
                    description: "new".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.average_rating, 6.5);
        assert_eq!(updated.scores, 1);

        let missing = repo
            .update(
                42,
                MovieUpdate {
                    title: "x".to_string(),
                    release_year: 1,
                    description: String::new(),
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_compare_and_set_rejects_stale_snapshot() {
        let repo = InMemoryMovieRepository::new();
        let ids = seed_rated(&repo, &[4.0]).await;

        let stale = RatingSnapshot::default();
        let next = RatingSnapshot {
            average_rating: 1.0,
            scores: 1,
        };
        assert!(!repo.compare_and_set_rating(ids[0], stale, next).await.unwrap());
        assert!(!repo.compare_and_set_rating(77, stale, next).await.unwrap());

        let movie = repo.find_by_id(ids[0]).await.unwrap().unwrap();
        assert_eq!(movie.average_rating, 4.0);
    }
}
