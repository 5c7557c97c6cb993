pub mod brand;
pub mod category;
pub mod health;
pub mod otp;
pub mod product;
pub mod product_group;
pub mod wishlist;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use brand::brand_router;
use category::category_router;
use health::health_router;
use otp::otp_router;
use product::product_router;
use product_group::product_group_router;
use wishlist::guest_wishlist_router;

pub fn public_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(health_router())
        .merge(category_router(db.clone()))
        .merge(brand_router(db.clone()))
        .merge(product_group_router(db.clone()))
        .merge(product_router(db.clone()))
        .merge(otp_router(db.clone(), config))
        .merge(guest_wishlist_router(db))
}
