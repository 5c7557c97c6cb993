pub mod wishlist;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};
use wishlist::wishlist_router;

pub fn user_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(wishlist_router(db.clone()))
        .route_layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Role::User,
                secret: Arc::new(config.secret.clone()),
            },
            auth_middleware,
        ))
}
