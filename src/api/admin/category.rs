use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::{double_option, SLUG_REGEX};
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::category::{
    self as category_repo, CategoryChanges, CategoryRepoError, NewCategory,
};

//ROUTERS
pub fn admin_category_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            get(admin_get_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .layer(Extension(db))
}

impl From<CategoryRepoError> for ApiError {
    fn from(err: CategoryRepoError) -> Self {
        match err {
            CategoryRepoError::Db(err) => err.into(),
            CategoryRepoError::NotFound(_) | CategoryRepoError::ParentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CategoryRepoError::Cycle(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

//ROUTES
async fn create_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCategory>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    let category = category_repo::insert(
        &txn,
        NewCategory {
            name: payload.name,
            slug: payload.slug,
            parent_id: payload.parent_id,
            display_order: payload.display_order.unwrap_or(0),
            icon_url: payload.icon_url,
            description: payload.description,
            is_active: payload.is_active.unwrap_or(true),
        },
    )
    .await?;
    txn.commit().await?;

    info!(id = %category.id, path = %category.path, "Created category");
    Ok(to_response((StatusCode::CREATED, Json(category)), Ok(())))
}

async fn admin_get_category(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    match category_repo::find_by_id(db.as_ref(), id).await? {
        Some(category) => Ok(to_response((StatusCode::OK, Json(category)), Ok(()))),
        None => Err(ApiError::NotFound(format!(
            "No category with {} id was found.",
            id
        ))),
    }
}

async fn patch_category(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCategory>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    let category = category_repo::update(
        &txn,
        id,
        CategoryChanges {
            name: payload.name,
            slug: payload.slug,
            parent_id: payload.parent_id,
            display_order: payload.display_order,
            icon_url: payload.icon_url,
            description: payload.description,
            is_active: payload.is_active,
        },
    )
    .await?;
    txn.commit().await?;

    Ok(to_response((StatusCode::OK, Json(category)), Ok(())))
}

async fn delete_category(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if !category_repo::delete_by_id(db.as_ref(), id).await? {
        return Err(ApiError::NotFound(format!(
            "No category with {} id was found.",
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
struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(length(min = 1, max = 100), regex(path = *SLUG_REGEX))]
    slug: String,
    parent_id: Option<Uuid>,
    display_order: Option<i32>,
    icon_url: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate, Debug)]
struct PatchCategory {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(length(min = 1, max = 100), regex(path = *SLUG_REGEX))]
    slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    parent_id: Option<Option<Uuid>>,
    display_order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    icon_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    is_active: Option<bool>,
}
