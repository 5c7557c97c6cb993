use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::entities::{
    product::{self, Status},
    product_image::{self, ImageType},
};
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    product as product_repo, product_group as product_group_repo,
    product_image as product_image_repo, product_view as product_view_repo,
};

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products/:sku", get(get_product))
        .route("/products/:sku/images", get(get_product_images))
        .layer(Extension(db))
}

async fn get_product(
    Path(sku): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let product = find_active(db.as_ref(), &sku).await?;

    // A lost view must not fail the page.
    let today = Utc::now().date_naive();
    if let Err(err) = product_view_repo::record_view(db.as_ref(), product.id, today).await {
        warn!(sku = %sku, error = %err, "Failed to record product view");
    }

    Ok(to_response(
        (StatusCode::OK, Json(ProductResponse::new(product))),
        Ok(()),
    ))
}

async fn get_product_images(
    Path(sku): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let product = find_active(db.as_ref(), &sku).await?;
    let response: Vec<ProductImageResponse> =
        product_image_repo::find_by_product_id(db.as_ref(), product.id)
            .await?
            .into_iter()
            .map(ProductImageResponse::new)
            .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

// A variant is only public while both it and its group are active.
async fn find_active(db: &DatabaseConnection, sku: &str) -> Result<product::Model, ApiError> {
    let not_found = || ApiError::NotFound(format!("No product with sku {} was found.", sku));

    let product = match product_repo::find_by_sku(db, sku).await? {
        Some(product) if product.status == Status::Active => product,
        _ => return Err(not_found()),
    };
    match product_group_repo::find_by_id(db, product.product_group_id).await? {
        Some(group) if group.status == Status::Active => Ok(product),
        _ => Err(not_found()),
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    id: Uuid,
    product_group_id: Uuid,
    sku: String,
    variant_name: Option<String>,
    mrp: Option<i64>,
    selling_price: Option<i64>,
    attributes: Option<Value>,
    status: Status,
    stock_quantity: i32,
    in_stock: bool,
    is_default_variant: bool,
}

impl ProductResponse {
    pub fn new(value: product::Model) -> ProductResponse {
        ProductResponse {
            id: value.id,
            product_group_id: value.product_group_id,
            sku: value.sku,
            variant_name: value.variant_name,
            mrp: value.mrp,
            selling_price: value.selling_price,
            attributes: value.attributes,
            status: value.status,
            in_stock: value.stock_quantity > 0,
            stock_quantity: value.stock_quantity,
            is_default_variant: value.is_default_variant,
        }
    }
}

#[derive(Serialize)]
pub struct ProductImageResponse {
    id: Uuid,
    product_id: Uuid,
    cloudinary_url: String,
    alt_text: Option<String>,
    display_order: i32,
    image_type: ImageType,
    is_primary: bool,
}

impl ProductImageResponse {
    pub fn new(value: product_image::Model) -> ProductImageResponse {
        ProductImageResponse {
            id: value.id,
            product_id: value.product_id,
            cloudinary_url: value.cloudinary_url,
            alt_text: value.alt_text,
            display_order: value.display_order,
            image_type: value.image_type,
            is_primary: value.is_primary,
        }
    }
}
