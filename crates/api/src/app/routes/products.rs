use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};

use stockroom_core::ProductId;
use stockroom_infra::report;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match report::product_catalog(services.store()).await {
        Ok(items) => Json(dto::Items::new(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    let fields = match form.into_fields() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().create_product(fields).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, name = %product.name, "product added");
            (StatusCode::CREATED, Json(dto::ack(product.id, "Product added."))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id, "product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().get_product(id).await {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => errors::not_found("product"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id, "product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let fields = match form.into_fields() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_product(id, fields).await {
        Ok(product) => Json(dto::ack(product.id, "Product updated.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Movements that reference the product stay in the ledger.
pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id, "product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_product(id).await {
        Ok(()) => Json(dto::ack(id, "Product deleted.")).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
