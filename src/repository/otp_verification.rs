use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::otp_verification::{self, Entity as OtpEntity, Purpose};

pub struct NewOtp {
    pub phone: String,
    pub otp_code: String,
    pub purpose: Purpose,
    pub expires_at: DateTime<Utc>,
}

/// Most recent code issued for a phone and purpose.
pub async fn find_top_by_phone_and_purpose<C>(
    db: &C,
    phone: &str,
    purpose: Purpose,
) -> Result<Option<otp_verification::Model>, DbErr>
where
    C: ConnectionTrait,
{
    OtpEntity::find()
        .filter(otp_verification::Column::Phone.eq(phone))
        .filter(otp_verification::Column::Purpose.eq(purpose))
        .order_by_desc(otp_verification::Column::CreatedAt)
        .one(db)
        .await
}

pub async fn insert<C>(db: &C, new: NewOtp) -> Result<otp_verification::Model, DbErr>
where
    C: ConnectionTrait,
{
    otp_verification::ActiveModel {
        id: Set(Uuid::new_v4()),
        phone: Set(new.phone),
        otp_code: Set(new.otp_code),
        purpose: Set(new.purpose),
        attempts: Set(0),
        is_verified: Set(false),
        expires_at: Set(new.expires_at),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Bumps the counter in the database so concurrent failures all count.
pub async fn record_failed_attempt<C>(db: &C, id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    OtpEntity::update_many()
        .col_expr(
            otp_verification::Column::Attempts,
            Expr::col(otp_verification::Column::Attempts).add(1),
        )
        .filter(otp_verification::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Consumes the code. Returns `false` when another request already did,
/// so each code signs in at most once.
pub async fn mark_verified<C>(db: &C, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = OtpEntity::update_many()
        .col_expr(otp_verification::Column::IsVerified, Expr::value(true))
        .filter(otp_verification::Column::Id.eq(id))
        .filter(otp_verification::Column::IsVerified.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}
