use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};

use stockroom_core::LocationId;
use stockroom_infra::report;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location).put(update_location).delete(delete_location))
}

pub async fn list_locations(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.store().list_locations().await {
        Ok(items) => Json(dto::Items::new(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::LocationForm>,
) -> axum::response::Response {
    let fields = match form.into_fields() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().create_location(fields).await {
        Ok(location) => {
            tracing::info!(location_id = %location.id, name = %location.name, "location added");
            (StatusCode::CREATED, Json(dto::ack(location.id, "Location added."))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Location detail plus the products whose standing quantity sits there.
pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: LocationId = match errors::parse_id(&id, "location") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let location = match services.store().get_location(id).await {
        Ok(Some(l)) => l,
        Ok(None) => return errors::not_found("location"),
        Err(e) => return errors::store_error_to_response(e),
    };

    match report::products_at_location(services.store(), id).await {
        Ok(products) => Json(serde_json::json!({
            "location": location,
            "products": products,
        }))
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<dto::LocationForm>,
) -> axum::response::Response {
    let id: LocationId = match errors::parse_id(&id, "location") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let fields = match form.into_fields() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_location(id, fields).await {
        Ok(location) => Json(dto::ack(location.id, "Location updated.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Products and movements pointing at the location keep their references.
pub async fn delete_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: LocationId = match errors::parse_id(&id, "location") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_location(id).await {
        Ok(()) => Json(dto::ack(id, "Location deleted.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
