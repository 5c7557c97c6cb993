use crate::entities::user::{self, Entity as UserEntity, Role};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{str::FromStr, sync::Arc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::logging::{to_response, ApiError};

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|header| header.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return unauthorized(AuthMiddlewareError::MissingToken),
    };

    let claims = match validate_token(&state, token).await {
        Ok(claims) => claims,
        Err(err) => {
            debug!(error = %err, "Rejected bearer token");
            return unauthorized(err);
        }
    };
    req.extensions_mut().insert(claims);
    next.run(req).await
}

fn unauthorized(err: AuthMiddlewareError) -> Response {
    let status = match err {
        AuthMiddlewareError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    };
    to_response(
        (status, Json(json!({ "error": err.to_string() }))),
        Err(ApiError::Unauthorized(err.to_string())),
    )
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub role: String,
    pub exp: usize,
}

#[derive(Clone, Debug)]
pub struct AuthState {
    pub db: Arc<DatabaseConnection>,
    pub role: Role,
    pub secret: Arc<String>,
}

pub fn generate_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    ttl: Duration,
) -> Result<String, AuthMiddlewareError> {
    let exp = Utc::now()
        .checked_add_signed(ttl)
        .ok_or(AuthMiddlewareError::GenerationFail)?
        .timestamp() as usize;

    let claims = Claims {
        user_id,
        role: role.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthMiddlewareError::GenerationFail)
}

/// Admin tokens pass every guard, user tokens only the user guard.
fn role_allows(required: Role, actual: Role) -> bool {
    match required {
        Role::User => true,
        Role::Admin => actual == Role::Admin,
    }
}

pub async fn validate_token(state: &AuthState, token: &str) -> Result<Claims, AuthMiddlewareError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthMiddlewareError::TokenExpired)?;

    let claims = token_data.claims;
    let role = Role::from_str(&claims.role).map_err(|_| AuthMiddlewareError::ValidationFail)?;

    match UserEntity::find_by_id(claims.user_id)
        .filter(user::Column::Role.eq(role))
        .one(&*state.db)
        .await
    {
        Ok(Some(_)) if role_allows(state.role, role) => Ok(claims),
        Ok(_) => Err(AuthMiddlewareError::InvalidUserOrRole),
        Err(_) => Err(AuthMiddlewareError::InternalServerError),
    }
}

#[derive(Error, Debug)]
pub enum AuthMiddlewareError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid user id or role")]
    InvalidUserOrRole,
    #[error("Token expired or malformed")]
    TokenExpired,
    #[error("Failed to validate token")]
    ValidationFail,
    #[error("Failed to generate token")]
    GenerationFail,
    #[error("Internal server error")]
    InternalServerError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_user_guard() {
        assert!(role_allows(Role::User, Role::Admin));
        assert!(role_allows(Role::User, Role::User));
    }

    #[test]
    fn user_fails_admin_guard() {
        assert!(!role_allows(Role::Admin, Role::User));
        assert!(role_allows(Role::Admin, Role::Admin));
    }

    #[test]
    fn token_round_trips_claims() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, Role::Admin, "secret", Duration::hours(1))
            .expect("token");
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .expect("decode");
        assert_eq!(data.claims.user_id, user_id);
        assert_eq!(data.claims.role, "admin");
    }
}
