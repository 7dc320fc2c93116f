//! Route table for the origin proxy.
//!
//! ## Structure
//! - `GET /health`  — liveness probe, never touches the store
//! - `GET /`        — proxied default document (`index.html`)
//! - `GET /{*path}` — any other path, proxied to the store
//!
//! The wildcard route carries all proxied traffic; key resolution happens
//! in the handler from the raw request path, not from the matched segment.

use crate::{
    handlers::{health_handlers::health, proxy_handlers::proxy_object},
    services::proxy_service::ProxyService,
};
use axum::{Router, routing::get};

/// Build the router. Shared state (`ProxyService`) is injected by the
/// caller via `with_state`.
pub fn routes() -> Router<ProxyService> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(proxy_object))
        .route("/{*path}", get(proxy_object))
}
