use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::entities::wishlist;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    product as product_repo,
    wishlist::{self as wishlist_repo, WishlistOwner},
};

pub fn guest_wishlist_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/wishlist", get(get_guest_wishlist).post(add_guest_entry))
        .route("/wishlist/:id", delete(remove_guest_entry))
        .layer(Extension(db))
}

async fn get_guest_wishlist(
    Query(params): Query<SessionQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    params.validate()?;
    list_entries(&db, &WishlistOwner::Session(params.session_id)).await
}

async fn add_guest_entry(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<AddGuestEntry>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    add_entry(&db, &WishlistOwner::Session(payload.session_id), payload.product_id).await
}

async fn remove_guest_entry(
    Path(id): Path<Uuid>,
    Query(params): Query<SessionQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    params.validate()?;
    remove_entry(&db, &WishlistOwner::Session(params.session_id), id).await
}

// Shared with the signed-in wishlist routes.
pub(crate) async fn list_entries(
    db: &DatabaseConnection,
    owner: &WishlistOwner,
) -> Result<Response, ApiError> {
    let response: Vec<WishlistResponse> = wishlist_repo::find_by_owner(db, owner)
        .await?
        .into_iter()
        .map(WishlistResponse::new)
        .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

pub(crate) async fn add_entry(
    db: &DatabaseConnection,
    owner: &WishlistOwner,
    product_id: Uuid,
) -> Result<Response, ApiError> {
    if product_repo::find_by_id(db, product_id).await?.is_none() {
        return Err(ApiError::NotFound(format!(
            "No product with id {} was found.",
            product_id
        )));
    }

    if let Some(existing) = wishlist_repo::find_entry(db, owner, product_id).await? {
        return Ok(to_response(
            (StatusCode::OK, Json(WishlistResponse::new(existing))),
            Ok(()),
        ));
    }

    // The unique owner/product index settles concurrent adds.
    match wishlist_repo::insert(db, owner, product_id).await {
        Ok(entry) => Ok(to_response(
            (StatusCode::CREATED, Json(WishlistResponse::new(entry))),
            Ok(()),
        )),
        Err(err) if is_unique_violation(&err) => {
            let existing = wishlist_repo::find_entry(db, owner, product_id)
                .await?
                .ok_or(ApiError::from(err))?;
            Ok(to_response(
                (StatusCode::OK, Json(WishlistResponse::new(existing))),
                Ok(()),
            ))
        }
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) async fn remove_entry(
    db: &DatabaseConnection,
    owner: &WishlistOwner,
    id: Uuid,
) -> Result<Response, ApiError> {
    if !wishlist_repo::delete_entry(db, owner, id).await? {
        return Err(ApiError::NotFound(format!(
            "No wishlist entry with id {} was found.",
            id
        )));
    }
    Ok(to_response(
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Resource deleted successfully."
            })),
        ),
        Ok(()),
    ))
}

//Struct
#[derive(Deserialize, Validate)]
struct SessionQuery {
    #[validate(length(min = 1, max = 100))]
    session_id: String,
}

#[derive(Deserialize, Validate)]
struct AddGuestEntry {
    #[validate(length(min = 1, max = 100))]
    session_id: String,
    product_id: Uuid,
}

#[derive(Serialize)]
pub struct WishlistResponse {
    id: Uuid,
    product_id: Uuid,
    created_at: DateTime<Utc>,
}

impl WishlistResponse {
    pub fn new(value: wishlist::Model) -> WishlistResponse {
        WishlistResponse {
            id: value.id,
            product_id: value.product_id,
            created_at: value.created_at,
        }
    }
}
