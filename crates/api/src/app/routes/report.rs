use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use stockroom_infra::report;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Current stock per (product, location), sorted by product then location name.
pub async fn balance_report(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match report::balances(services.store()).await {
        Ok(rows) => Json(dto::Items::new(rows)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
