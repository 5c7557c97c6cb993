use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::public::product::{ProductImageResponse, ProductResponse};
use crate::api::validation::{double_option, SKU_REGEX};
use crate::entities::{
    product::{self, Status},
    product_image::ImageType,
    product_view,
};
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    product::{self as product_repo, NewProduct, ProductChanges},
    product_group as product_group_repo,
    product_image::{self as product_image_repo, NewProductImage},
    product_view as product_view_repo,
};

//ROUTERS
pub fn admin_product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/:id",
            get(admin_get_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/products/:id/views", get(get_product_views))
        .route("/products/:id/images", post(create_product_image))
        .route("/images/:id", delete(delete_product_image))
        .layer(Extension(db))
}

fn product_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("No product with {} id was found.", id))
}

fn check_prices(mrp: Option<i64>, selling_price: Option<i64>) -> Result<(), ApiError> {
    if mrp.unwrap_or(0) < 0 || selling_price.unwrap_or(0) < 0 {
        return Err(ApiError::BadRequest("Prices can't be negative.".to_string()));
    }
    if let (Some(mrp), Some(selling_price)) = (mrp, selling_price) {
        if selling_price > mrp {
            return Err(ApiError::BadRequest(
                "Selling price can't exceed the MRP.".to_string(),
            ));
        }
    }
    Ok(())
}

//ROUTES
async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    check_prices(payload.mrp, payload.selling_price)?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    if product_group_repo::find_by_id(&txn, payload.product_group_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "No product group with {} id was found.",
            payload.product_group_id
        )));
    }

    let product = product_repo::insert(
        &txn,
        NewProduct {
            product_group_id: payload.product_group_id,
            sku: payload.sku,
            variant_name: payload.variant_name,
            mrp: payload.mrp,
            selling_price: payload.selling_price,
            attributes: payload.attributes,
            status: payload.status.unwrap_or(Status::Active),
            stock_quantity: payload.stock_quantity.unwrap_or(0),
            is_default_variant: payload.is_default_variant.unwrap_or(false),
            meta_title: payload.meta_title,
            meta_description: payload.meta_description,
        },
    )
    .await?;
    txn.commit().await?;

    info!(id = %product.id, sku = %product.sku, "Created product");
    Ok(to_response(
        (StatusCode::CREATED, Json(AdminProductResponse::new(product))),
        Ok(()),
    ))
}

async fn admin_get_product(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let product = product_repo::find_by_id(db.as_ref(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(to_response(
        (StatusCode::OK, Json(AdminProductResponse::new(product))),
        Ok(()),
    ))
}

async fn patch_product(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    let current = product_repo::find_by_id(&txn, id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    // A present field wins even when it is null.
    check_prices(
        payload.mrp.unwrap_or(current.mrp),
        payload.selling_price.unwrap_or(current.selling_price),
    )?;

    let product = product_repo::update(
        &txn,
        current,
        ProductChanges {
            variant_name: payload.variant_name,
            mrp: payload.mrp,
            selling_price: payload.selling_price,
            attributes: payload.attributes,
            status: payload.status,
            stock_quantity: payload.stock_quantity,
            is_default_variant: payload.is_default_variant,
            meta_title: payload.meta_title,
            meta_description: payload.meta_description,
        },
    )
    .await?;
    txn.commit().await?;

    Ok(to_response(
        (StatusCode::OK, Json(AdminProductResponse::new(product))),
        Ok(()),
    ))
}

async fn delete_product(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if !product_repo::delete_by_id(db.as_ref(), id).await? {
        return Err(product_not_found(id));
    }
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Resource deleted successfully."
            })),
        ),
        Ok(()),
    ))
}

async fn get_product_views(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if product_repo::find_by_id(db.as_ref(), id).await?.is_none() {
        return Err(product_not_found(id));
    }

    let response: Vec<ProductViewResponse> = product_view_repo::find_by_product_id(db.as_ref(), id)
        .await?
        .into_iter()
        .map(ProductViewResponse::new)
        .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn create_product_image(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProductImage>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    if product_repo::find_by_id(&txn, id).await?.is_none() {
        return Err(product_not_found(id));
    }

    let image = product_image_repo::insert(
        &txn,
        NewProductImage {
            product_id: id,
            cloudinary_url: payload.cloudinary_url,
            alt_text: payload.alt_text,
            display_order: payload.display_order.unwrap_or(0),
            image_type: payload.image_type.unwrap_or(ImageType::Product),
            is_primary: payload.is_primary.unwrap_or(false),
        },
    )
    .await?;
    txn.commit().await?;

    Ok(to_response(
        (StatusCode::CREATED, Json(ProductImageResponse::new(image))),
        Ok(()),
    ))
}

async fn delete_product_image(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if !product_image_repo::delete_by_id(db.as_ref(), id).await? {
        return Err(ApiError::NotFound(format!(
            "No image with {} id was found.",
            id
        )));
    }
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Resource deleted successfully."
            })),
        ),
        Ok(()),
    ))
}

//Struct
#[derive(Deserialize, Validate, Debug)]
struct CreateProduct {
    product_group_id: Uuid,
    #[validate(length(min = 1, max = 100), regex(path = *SKU_REGEX))]
    sku: String,
    #[validate(length(max = 100))]
    variant_name: Option<String>,
    #[validate(range(min = 0))]
    mrp: Option<i64>,
    #[validate(range(min = 0))]
    selling_price: Option<i64>,
    attributes: Option<Value>,
    status: Option<Status>,
    #[validate(range(min = 0))]
    stock_quantity: Option<i32>,
    is_default_variant: Option<bool>,
    #[validate(length(max = 200))]
    meta_title: Option<String>,
    meta_description: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
struct PatchProduct {
    #[validate(length(max = 100))]
    variant_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    mrp: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    selling_price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    attributes: Option<Option<Value>>,
    status: Option<Status>,
    #[validate(range(min = 0))]
    stock_quantity: Option<i32>,
    is_default_variant: Option<bool>,
    #[validate(length(max = 200))]
    meta_title: Option<String>,
    meta_description: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
struct CreateProductImage {
    #[validate(length(min = 1))]
    cloudinary_url: String,
    #[validate(length(max = 200))]
    alt_text: Option<String>,
    display_order: Option<i32>,
    image_type: Option<ImageType>,
    is_primary: Option<bool>,
}

/// Public product view plus the fields only the back office sees.
#[derive(Serialize)]
struct AdminProductResponse {
    #[serde(flatten)]
    product: ProductResponse,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl AdminProductResponse {
    fn new(value: product::Model) -> AdminProductResponse {
        AdminProductResponse {
            created_at: value.created_at,
            updated_at: value.updated_at,
            product: ProductResponse::new(value),
        }
    }
}

#[derive(Serialize)]
struct ProductViewResponse {
    day: NaiveDate,
    view_count: i32,
}

impl ProductViewResponse {
    fn new(value: product_view::Model) -> ProductViewResponse {
        ProductViewResponse {
            day: value.viewed_at,
            view_count: value.view_count,
        }
    }
}
