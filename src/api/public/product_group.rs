use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::product::ProductResponse;
use crate::entities::product_group::{self, Status};
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    product as product_repo,
    product_group::{self as product_group_repo, ProductGroupFilter},
};

pub fn product_group_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product-groups", get(get_product_groups))
        .route("/product-groups/:slug", get(get_product_group))
        .layer(Extension(db))
}

async fn get_product_groups(
    Query(params): Query<GetProductGroupsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let filter = ProductGroupFilter {
        category_id: params.category_id,
        brand_id: params.brand_id,
        featured_only: params.featured.unwrap_or(false),
        status: Some(Status::Active),
    };
    let response: Vec<ProductGroupResponse> =
        product_group_repo::find_filtered(db.as_ref(), &filter)
            .await?
            .into_iter()
            .map(ProductGroupResponse::new)
            .collect();
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

async fn get_product_group(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let group = match product_group_repo::find_by_slug(db.as_ref(), &slug).await? {
        Some(group) if group.status == Status::Active => group,
        _ => {
            return Err(ApiError::NotFound(format!(
                "No product group with slug {} was found.",
                slug
            )))
        }
    };

    let variants: Vec<ProductResponse> =
        product_repo::find_by_product_group_id(db.as_ref(), group.id)
            .await?
            .into_iter()
            .filter(|variant| variant.status == Status::Active)
            .map(ProductResponse::new)
            .collect();

    let response = ProductGroupDetailResponse {
        group: ProductGroupResponse::new(group),
        variants,
    };
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}

//Struct
#[derive(Deserialize)]
struct GetProductGroupsQuery {
    category_id: Option<Uuid>,
    brand_id: Option<Uuid>,
    featured: Option<bool>,
}

#[derive(Serialize)]
pub struct ProductGroupResponse {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    category_id: Uuid,
    brand_id: Option<Uuid>,
    base_price: Option<i64>,
    status: Status,
    is_featured: bool,
    meta_title: Option<String>,
    meta_description: Option<String>,
}

impl ProductGroupResponse {
    pub fn new(value: product_group::Model) -> ProductGroupResponse {
        ProductGroupResponse {
            id: value.id,
            name: value.name,
            slug: value.slug,
            description: value.description,
            category_id: value.category_id,
            brand_id: value.brand_id,
            base_price: value.base_price,
            status: value.status,
            is_featured: value.is_featured,
            meta_title: value.meta_title,
            meta_description: value.meta_description,
        }
    }
}

#[derive(Serialize)]
struct ProductGroupDetailResponse {
    #[serde(flatten)]
    group: ProductGroupResponse,
    variants: Vec<ProductResponse>,
}
