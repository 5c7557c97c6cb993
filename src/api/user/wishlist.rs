use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::public::wishlist::{add_entry, list_entries, remove_entry};
use crate::middleware::auth::Claims;
use crate::middleware::logging::ApiError;
use crate::repository::wishlist::WishlistOwner;

//ROUTERS
pub fn wishlist_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/wishlist", get(get_wishlist).post(add_product))
        .route("/wishlist/:id", delete(remove_product))
        .layer(Extension(db))
}

async fn get_wishlist(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    list_entries(&db, &WishlistOwner::User(claims.user_id)).await
}

async fn add_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddProduct>,
) -> Result<Response, ApiError> {
    add_entry(&db, &WishlistOwner::User(claims.user_id), payload.product_id).await
}

async fn remove_product(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    remove_entry(&db, &WishlistOwner::User(claims.user_id), id).await
}

#[derive(Deserialize, Debug)]
struct AddProduct {
    product_id: Uuid,
}
