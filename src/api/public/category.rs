use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::category;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{category as category_repo, category_brand as category_brand_repo};

pub fn category_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/tree", get(get_category_tree))
        .route("/categories/:slug", get(get_category))
        .route("/categories/:slug/children", get(get_children))
        .route("/categories/:slug/brands", get(get_category_brands))
        .layer(Extension(db))
}

async fn get_categories(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let categories = category_repo::find_all_visible(db.as_ref()).await?;
    let response: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::new).collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn get_category_tree(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let categories = category_repo::find_all_visible(db.as_ref()).await?;
    let tree = category_repo::build_tree(categories);
    Ok(to_response((StatusCode::OK, Json(tree)), Ok(())))
}

async fn get_category(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let category = find_active(db.as_ref(), &slug).await?;
    Ok(to_response(
        (StatusCode::OK, Json(CategoryResponse::new(category))),
        Ok(()),
    ))
}

async fn get_children(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let parent = find_active(db.as_ref(), &slug).await?;
    let response: Vec<CategoryResponse> = category_repo::find_children(db.as_ref(), parent.id)
        .await?
        .into_iter()
        .filter(|child| child.is_active)
        .map(CategoryResponse::new)
        .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn get_category_brands(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let category = find_active(db.as_ref(), &slug).await?;
    let response: Vec<CategoryBrandResponse> =
        category_brand_repo::find_by_category_id(db.as_ref(), category.id)
            .await?
            .into_iter()
            .filter_map(|(row, brand)| {
                brand
                    .filter(|brand| brand.is_active)
                    .map(|brand| CategoryBrandResponse {
                        brand_id: brand.id,
                        name: brand.name,
                        slug: brand.slug,
                        logo_url: brand.logo_url,
                        product_count: row.product_count,
                        last_updated: row.last_updated,
                    })
            })
            .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn find_active(db: &DatabaseConnection, slug: &str) -> Result<category::Model, ApiError> {
    match category_repo::find_visible_by_slug(db, slug).await? {
        Some(category) => Ok(category),
        None => Err(ApiError::NotFound(format!(
            "No category with slug {} was found.",
            slug
        ))),
    }
}

//Struct
#[derive(Serialize)]
pub struct CategoryResponse {
    id: Uuid,
    name: String,
    slug: String,
    parent_id: Option<Uuid>,
    path: String,
    level: i32,
    display_order: i32,
    icon_url: Option<String>,
    description: Option<String>,
}

impl CategoryResponse {
    pub fn new(value: category::Model) -> CategoryResponse {
        CategoryResponse {
            id: value.id,
            name: value.name,
            slug: value.slug,
            parent_id: value.parent_id,
            path: value.path,
            level: value.level,
            display_order: value.display_order,
            icon_url: value.icon_url,
            description: value.description,
        }
    }
}

#[derive(Serialize)]
struct CategoryBrandResponse {
    brand_id: Uuid,
    name: String,
    slug: String,
    logo_url: Option<String>,
    product_count: i32,
    last_updated: DateTime<Utc>,
}
