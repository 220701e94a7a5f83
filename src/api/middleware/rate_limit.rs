//! Rate limiting middleware using token bucket algorithm.

use anyhow::Context;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

/// Sustained requests per second allowed per client.
pub const REQUESTS_PER_SECOND: u64 = 10;
/// Requests a client may send in a burst before being throttled.
pub const BURST_SIZE: u32 = 100;

/// Creates the per-client rate limiter.
///
/// # Limits
///
/// - **Rate**: [`REQUESTS_PER_SECOND`]
/// - **Burst**: [`BURST_SIZE`]
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Pass `PeerIpKeyExtractor` to key on the socket peer address, or
/// `SmartIpKeyExtractor` when the service runs behind a reverse proxy that
/// sets `X-Forwarded-For` / `X-Real-Ip`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(movie_routes())
///     .layer(rate_limit::layer(PeerIpKeyExtractor)?);
/// ```
pub fn layer<K>(
    key_extractor: K,
) -> anyhow::Result<GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>>
where
    K: KeyExtractor,
{
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(REQUESTS_PER_SECOND)
        .burst_size(BURST_SIZE)
        .key_extractor(key_extractor)
        .finish()
        .context("Invalid rate limiter configuration")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}
