use axum::{extract::Extension, http::StatusCode, response::Response, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::PHONE_REGEX;
use crate::config::AppConfig;
use crate::entities::{otp_verification::Purpose, user::Role};
use crate::middleware::auth::generate_token;
use crate::middleware::logging::{to_response, ApiError};
use crate::repository::{
    otp_verification::{self as otp_repo, NewOtp},
    user as user_repo, wishlist as wishlist_repo,
};

pub fn otp_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/otp", post(request_otp))
        .route("/otp/verify", post(verify_otp))
        .layer(Extension(db))
        .layer(Extension(config))
}

pub fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

//ROUTES
async fn request_otp(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<RequestOtp>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let code = generate_code();
    let otp = otp_repo::insert(
        db.as_ref(),
        NewOtp {
            phone: payload.phone,
            otp_code: code.clone(),
            purpose: payload.purpose.unwrap_or_default(),
            expires_at: Utc::now() + config.otp_ttl(),
        },
    )
    .await?;

    // No SMS gateway is wired in; the code only goes to the debug log.
    debug!(phone = %otp.phone, purpose = ?otp.purpose, code = %code, "Issued OTP");

    Ok(to_response(
        (
            StatusCode::CREATED,
            Json(OtpIssuedResponse {
                message: "OTP sent",
                expires_at: otp.expires_at,
            }),
        ),
        Ok(()),
    ))
}

async fn verify_otp(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<VerifyOtp>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let purpose = payload.purpose.unwrap_or_default();

    let txn = db
        .begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)?;

    let otp = otp_repo::find_top_by_phone_and_purpose(&txn, &payload.phone, purpose)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No OTP was issued for {}", payload.phone)))?;

    if otp.is_verified {
        return Err(ApiError::BadRequest("OTP was already used".into()));
    }
    if otp.is_expired(Utc::now()) {
        return Err(ApiError::Gone("OTP expired".into()));
    }
    if otp.attempts >= config.otp_max_attempts {
        return Err(ApiError::TooManyAttempts(
            "Too many failed attempts, request a new OTP".into(),
        ));
    }
    if otp.otp_code != payload.code {
        otp_repo::record_failed_attempt(&txn, otp.id).await?;
        txn.commit().await?;
        return Err(ApiError::Unauthorized("Invalid OTP".into()));
    }

    if !otp_repo::mark_verified(&txn, otp.id).await? {
        return Err(ApiError::BadRequest("OTP was already used".into()));
    }

    let role = if config.is_admin_phone(&payload.phone) {
        Role::Admin
    } else {
        Role::User
    };
    let user = user_repo::find_or_create_by_phone(&txn, &payload.phone, role).await?;

    if let Some(session_id) = payload.session_id.as_deref() {
        let moved = wishlist_repo::claim_session(&txn, session_id, user.id).await?;
        debug!(user_id = %user.id, moved, "Claimed guest wishlist");
    }

    txn.commit().await?;

    let token = generate_token(user.id, user.role, &config.secret, config.token_ttl())
        .map_err(|err| ApiError::General(err.to_string()))?;
    info!(user_id = %user.id, role = %user.role, "User signed in with OTP");

    Ok(to_response(
        (
            StatusCode::OK,
            Json(TokenResponse {
                token,
                user_id: user.id,
                role: user.role,
            }),
        ),
        Ok(()),
    ))
}

//Struct
#[derive(Deserialize, Validate, Debug)]
struct RequestOtp {
    #[validate(regex(path = *PHONE_REGEX, message = "invalid phone number"))]
    phone: String,
    purpose: Option<Purpose>,
}

#[derive(Deserialize, Validate, Debug)]
struct VerifyOtp {
    #[validate(regex(path = *PHONE_REGEX, message = "invalid phone number"))]
    phone: String,
    #[validate(length(equal = 6))]
    code: String,
    purpose: Option<Purpose>,
    #[validate(length(min = 1, max = 100))]
    session_id: Option<String>,
}

#[derive(Serialize)]
struct OtpIssuedResponse {
    message: &'static str,
    expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
    user_id: Uuid,
    role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
