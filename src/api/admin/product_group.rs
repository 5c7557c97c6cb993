use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{patch, post},
    Json, Router,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::{double_option, SLUG_REGEX};
use crate::entities::product_group::Status;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    brand as brand_repo, category as category_repo,
    product_group::{self as product_group_repo, NewProductGroup, ProductGroupChanges},
};

//ROUTERS
pub fn admin_product_group_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product-groups", post(create_product_group))
        .route(
            "/product-groups/:id",
            patch(patch_product_group).delete(delete_product_group),
        )
        .layer(Extension(db))
}

async fn ensure_references<C>(
    db: &C,
    category_id: Option<Uuid>,
    brand_id: Option<Uuid>,
) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    if let Some(category_id) = category_id {
        if category_repo::find_by_id(db, category_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "No category with {} id was found.",
                category_id
            )));
        }
    }
    if let Some(brand_id) = brand_id {
        if brand_repo::find_by_id(db, brand_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "No brand with {} id was found.",
                brand_id
            )));
        }
    }
    Ok(())
}

//ROUTES
async fn create_product_group(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProductGroup>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;
    ensure_references(&txn, Some(payload.category_id), payload.brand_id).await?;

    let group = product_group_repo::insert(
        &txn,
        NewProductGroup {
            name: payload.name,
            slug: payload.slug,
            description: payload.description,
            category_id: payload.category_id,
            brand_id: payload.brand_id,
            base_price: payload.base_price,
            search_keywords: payload.search_keywords,
            status: payload.status.unwrap_or(Status::Active),
            is_featured: payload.is_featured.unwrap_or(false),
            meta_title: payload.meta_title,
            meta_description: payload.meta_description,
        },
    )
    .await?;
    txn.commit().await?;

    Ok(to_response((StatusCode::CREATED, Json(group)), Ok(())))
}

async fn patch_product_group(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProductGroup>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    let current = product_group_repo::find_by_id(&txn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No product group with {} id was found.", id)))?;
    ensure_references(&txn, payload.category_id, payload.brand_id.flatten()).await?;

    let group = product_group_repo::update(
        &txn,
        current,
        ProductGroupChanges {
            name: payload.name,
            slug: payload.slug,
            description: payload.description,
            category_id: payload.category_id,
            brand_id: payload.brand_id,
            base_price: payload.base_price,
            search_keywords: payload.search_keywords,
            status: payload.status,
            is_featured: payload.is_featured,
            meta_title: payload.meta_title,
            meta_description: payload.meta_description,
        },
    )
    .await?;
    txn.commit().await?;

    Ok(to_response((StatusCode::OK, Json(group)), Ok(())))
}

async fn delete_product_group(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if !product_group_repo::delete_by_id(db.as_ref(), id).await? {
        return Err(ApiError::NotFound(format!(
            "No product group with {} id was found.",
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
struct CreateProductGroup {
    #[validate(length(min = 1, max = 200))]
    name: String,
    #[validate(length(min = 1, max = 200), regex(path = *SLUG_REGEX))]
    slug: String,
    description: Option<String>,
    category_id: Uuid,
    brand_id: Option<Uuid>,
    #[validate(range(min = 0))]
    base_price: Option<i64>,
    #[validate(length(max = 500))]
    search_keywords: Option<String>,
    status: Option<Status>,
    is_featured: Option<bool>,
    #[validate(length(max = 200))]
    meta_title: Option<String>,
    meta_description: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
struct PatchProductGroup {
    #[validate(length(min = 1, max = 200))]
    name: Option<String>,
    #[validate(length(min = 1, max = 200), regex(path = *SLUG_REGEX))]
    slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    category_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    brand_id: Option<Option<Uuid>>,
    #[validate(range(min = 0))]
    base_price: Option<i64>,
    #[validate(length(max = 500))]
    search_keywords: Option<String>,
    status: Option<Status>,
    is_featured: Option<bool>,
    #[validate(length(max = 200))]
    meta_title: Option<String>,
    meta_description: Option<String>,
}
