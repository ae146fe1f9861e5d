use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};

use stockroom_core::MovementId;
use stockroom_infra::{record_movement, report};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/:id", get(get_movement).put(update_movement).delete(delete_movement))
}

/// Movement log, newest first.
pub async fn list_movements(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match report::movement_log(services.store()).await {
        Ok(items) => Json(dto::Items::new(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Record a movement. Product and location tokens are resolved by id or name,
/// creating missing entities on the way.
pub async fn create_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::MovementForm>,
) -> axum::response::Response {
    let request = match form.into_request() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match record_movement(services.store(), request).await {
        Ok(movement) => (StatusCode::CREATED, Json(dto::ack(movement.id, "Movement recorded."))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MovementId = match errors::parse_id(&id, "movement") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().get_movement(id).await {
        Ok(Some(movement)) => Json(movement).into_response(),
        Ok(None) => errors::not_found("movement"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Edit a movement in place. References must be ids; the timestamp is kept.
pub async fn update_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<dto::MovementForm>,
) -> axum::response::Response {
    let id: MovementId = match errors::parse_id(&id, "movement") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let fields = match form.into_edit() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_movement(id, fields).await {
        Ok(movement) => Json(dto::ack(movement.id, "Movement updated.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MovementId = match errors::parse_id(&id, "movement") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_movement(id).await {
        Ok(()) => Json(dto::ack(id, "Movement deleted.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
