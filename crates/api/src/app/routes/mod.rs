use axum::{routing::get, Router};

pub mod locations;
pub mod movements;
pub mod products;
pub mod report;
pub mod system;

/// Router for every inventory endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/locations", locations::router())
        .nest("/movements", movements::router())
        .route("/report", get(report::balance_report))
}
