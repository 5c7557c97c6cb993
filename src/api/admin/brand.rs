use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{delete, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::SLUG_REGEX;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::brand::{self as brand_repo, NewBrand};

pub fn admin_brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/brands", post(create_brand))
        .route("/brands/:id", delete(delete_brand))
        .layer(Extension(db))
}

async fn create_brand(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateBrand>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let brand = brand_repo::insert(
        db.as_ref(),
        NewBrand {
            name: payload.name,
            slug: payload.slug,
            logo_url: payload.logo_url,
            description: payload.description,
            is_active: payload.is_active.unwrap_or(true),
        },
    )
    .await?;
    Ok(to_response((StatusCode::CREATED, Json(brand)), Ok(())))
}

async fn delete_brand(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    if !brand_repo::delete_by_id(db.as_ref(), id).await? {
        return Err(ApiError::NotFound(format!("No brand with {} id was found.", id)));
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

#[derive(Deserialize, Validate, Debug)]
struct CreateBrand {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(length(min = 1, max = 100), regex(path = *SLUG_REGEX))]
    slug: String,
    logo_url: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}
