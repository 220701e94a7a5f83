#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use movie_catalog::api::routes::movie_routes;
use movie_catalog::domain::entities::{Movie, NewMovie, UserRating};
use movie_catalog::domain::gateways::RatingClient;
use movie_catalog::domain::repositories::MovieRepository;
use movie_catalog::error::AppError;
use movie_catalog::infrastructure::memory::InMemoryMovieRepository;
use movie_catalog::state::AppState;
use serde_json::json;
use std::sync::Arc;

/// Rating service double answering every user with the same result.
pub enum StubRatingClient {
    Ratings(Vec<UserRating>),
    Unavailable,
}

#[async_trait]
impl RatingClient for StubRatingClient {
    async fn ratings_by_user(&self, user_id: i32) -> Result<Vec<UserRating>, AppError> {
        match self {
            StubRatingClient::Ratings(ratings) => Ok(ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect()),
            StubRatingClient::Unavailable => Err(AppError::upstream_unavailable(
                "Rating service unavailable",
                json!({}),
            )),
        }
    }
}

pub fn rating(movie_id: i32, user_id: i32, rating: f64) -> UserRating {
    UserRating {
        movie_id,
        user_id,
        rating,
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryMovieRepository>,
    pub state: AppState,
}

pub fn create_test_app(rating_client: StubRatingClient) -> TestApp {
    let repository = Arc::new(InMemoryMovieRepository::new());
    let state = AppState::new(repository.clone(), Arc::new(rating_client), "memory", 5);

    let app = movie_routes().with_state(state.clone());

    TestApp {
        server: TestServer::new(app).unwrap(),
        repository,
        state,
    }
}

pub async fn create_test_movie(
    repository: &InMemoryMovieRepository,
    title: &str,
    release_year: i32,
) -> Movie {
    repository
        .create(NewMovie {
            title: title.to_string(),
            release_year,
            description: String::new(),
        })
        .await
        .unwrap()
}
