//! Cross-origin resource sharing.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header. The catalog is meant to be called
/// from browser front-ends served on other origins.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
