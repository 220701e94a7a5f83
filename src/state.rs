//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::MovieService;
use crate::domain::gateways::RatingClient;
use crate::domain::repositories::MovieRepository;

/// The movie service as wired at runtime, over trait objects so the store
/// backend can be chosen by configuration.
pub type CatalogService = MovieService<dyn MovieRepository, dyn RatingClient>;

#[derive(Clone)]
pub struct AppState {
    pub movie_service: Arc<CatalogService>,
    /// Human-readable name of the configured store, reported by `/health`.
    pub store_backend: &'static str,
}

impl AppState {
    /// Builds the service graph from a store and a rating-service client.
    pub fn new(
        repository: Arc<dyn MovieRepository>,
        rating_client: Arc<dyn RatingClient>,
        store_backend: &'static str,
        max_rating_retries: u32,
    ) -> Self {
        let movie_service = MovieService::new(repository, rating_client)
            .with_max_rating_retries(max_rating_retries);

        Self {
            movie_service: Arc::new(movie_service),
            store_backend,
        }
    }
}
