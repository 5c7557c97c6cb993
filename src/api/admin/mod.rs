pub mod brand;
pub mod category;
pub mod category_brand;
pub mod product;
pub mod product_group;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use brand::admin_brand_router;
use category::admin_category_router;
use category_brand::admin_category_brand_router;
use product::admin_product_router;
use product_group::admin_product_group_router;

use crate::config::AppConfig;
use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};

pub fn admin_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(admin_category_router(db.clone()))
        .merge(admin_brand_router(db.clone()))
        .merge(admin_product_group_router(db.clone()))
        .merge(admin_product_router(db.clone()))
        .merge(admin_category_brand_router(db.clone()))
        .route_layer(from_fn_with_state(
            AuthState {
                db,
                role: Role::Admin,
                secret: Arc::new(config.secret.clone()),
            },
            auth_middleware,
        ))
}
