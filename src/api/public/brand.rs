use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::brand;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::brand as brand_repo;

pub fn brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/brands", get(get_brands))
        .route("/brands/:slug", get(get_brand))
        .layer(Extension(db))
}

async fn get_brands(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let response: Vec<BrandResponse> = brand_repo::find_all_active(db.as_ref())
        .await?
        .into_iter()
        .map(BrandResponse::new)
        .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn get_brand(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    match brand_repo::find_by_slug(db.as_ref(), &slug).await? {
        Some(brand) if brand.is_active => Ok(to_response(
            (StatusCode::OK, Json(BrandResponse::new(brand))),
            Ok(()),
        )),
        _ => Err(ApiError::NotFound(format!(
            "No brand with slug {} was found.",
            slug
        ))),
    }
}

#[derive(Serialize)]
pub struct BrandResponse {
    id: Uuid,
    name: String,
    slug: String,
    logo_url: Option<String>,
    description: Option<String>,
}

impl BrandResponse {
    pub fn new(value: brand::Model) -> BrandResponse {
        BrandResponse {
            id: value.id,
            name: value.name,
            slug: value.slug,
            logo_url: value.logo_url,
            description: value.description,
        }
    }
}
