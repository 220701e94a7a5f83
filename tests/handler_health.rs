mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::StubRatingClient;
use movie_catalog::api::handlers::health_handler;

fn make_server() -> TestServer {
    let app = common::create_test_app(StubRatingClient::Ratings(vec![]));
    let router = Router::new()
        .route("/health", get(health_handler))
        .with_state(app.state);

    TestServer::new(router).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = make_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["message"], "memory, 0 movies");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = make_server();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["checks"].get("store").is_some());
}
