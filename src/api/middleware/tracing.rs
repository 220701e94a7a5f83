//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

/// Trace layer with a per-request span keyed by route template.
pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<Body>) -> Span>;

/// Creates a tracing middleware for HTTP requests.
///
/// **On Request:** opens an `INFO` span carrying the method, the route
/// template (`/movies/update-avg-rating/{id}`), the concrete URI and the
/// HTTP version. Grouping by `route` keeps per-movie URIs from fragmenting
/// log queries.
///
/// **On Response:** logs at `INFO` with status code and latency in
/// milliseconds.
///
/// ```text
/// INFO request{method=PATCH route=/movies/update-avg-rating/{id} uri=/movies/update-avg-rating/7 version=HTTP/1.1}: finished processing request latency=3 ms status=200
/// ```
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(movie_routes())
///     .layer(tracing::layer());
/// ```
pub fn layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request<Body>) -> Span)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        route = %route_label(request),
        uri = %request.uri(),
        version = ?request.version(),
    )
}

/// The matched route template, or the raw path when no route matched.
fn route_label<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| request.uri().path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    #[test]
    fn test_unmatched_request_labelled_by_path() {
        let request = Request::get("/movies/7?x=1").body(()).unwrap();
        assert_eq!(route_label(&request), "/movies/7");
    }

    #[tokio::test]
    async fn test_route_template_seen_by_layer() {
        let app = Router::new()
            .route(
                "/movies/{id}",
                get(|path: MatchedPath| async move { path.as_str().to_string() }),
            )
            .layer(layer());

        let response = app
            .oneshot(Request::get("/movies/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"/movies/{id}");
    }
}
