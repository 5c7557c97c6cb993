use axum::{extract::Extension, http::StatusCode, response::Response, routing::post, Json, Router};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::middleware::logging::{to_response, ApiError};
use crate::repository::category_brand as category_brand_repo;

pub fn admin_category_brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/category-brands/refresh", post(refresh_category_brands))
        .layer(Extension(db))
}

async fn refresh_category_brands(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;
    let written = category_brand_repo::refresh(&txn).await?;
    txn.commit().await?;

    info!(rows = written, "Refreshed category brand counts");
    Ok(to_response(
        (StatusCode::OK, Json(json!({ "rows": written }))),
        Ok(()),
    ))
}
