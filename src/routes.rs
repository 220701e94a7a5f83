//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: movie store (not rate limited)
//! - `/movies/*`      - Movie catalog REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be configured.
pub fn app_router(state: AppState, behind_proxy: bool) -> anyhow::Result<NormalizePath<Router>> {
    let movie_router = if behind_proxy {
        api::routes::movie_routes().layer(rate_limit::layer(SmartIpKeyExtractor)?)
    } else {
        api::routes::movie_routes().layer(rate_limit::layer(PeerIpKeyExtractor)?)
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(movie_router)
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateways::MockRatingClient;
    use crate::infrastructure::memory::InMemoryMovieRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryMovieRepository::new()),
            Arc::new(MockRatingClient::new()),
            "memory",
            5,
        )
    }

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        let app = app_router(state(), false).unwrap();

        let response = app
            .oneshot(Request::get("/health/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = app_router(state(), false).unwrap();

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "http://front.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_forwarded_ip_is_used_behind_proxy() {
        let app = app_router(state(), true).unwrap();

        let response = app
            .oneshot(
                Request::get("/movies/count")
                    .header("x-forwarded-for", "203.0.113.7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"0");
    }
}
