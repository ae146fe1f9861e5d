//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: the shared store handle passed to every handler
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: form DTOs, coercion into domain field sets, JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use stockroom_infra::EntityStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: Arc<dyn EntityStore>) -> Router {
    let services = Arc::new(services::AppServices::new(store));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
