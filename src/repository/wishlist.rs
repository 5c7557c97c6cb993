use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::wishlist::{self, Entity as WishlistEntity};

/// Who a wishlist row belongs to.
#[derive(Clone, Debug, PartialEq)]
pub enum WishlistOwner {
    User(Uuid),
    Session(String),
}

impl WishlistOwner {
    fn condition(&self) -> Condition {
        match self {
            WishlistOwner::User(user_id) => {
                Condition::all().add(wishlist::Column::UserId.eq(*user_id))
            }
            WishlistOwner::Session(session_id) => Condition::all()
                .add(wishlist::Column::UserId.is_null())
                .add(wishlist::Column::SessionId.eq(session_id.as_str())),
        }
    }
}

pub async fn find_by_user_id<C>(db: &C, user_id: Uuid) -> Result<Vec<wishlist::Model>, DbErr>
where
    C: ConnectionTrait,
{
    find_by_owner(db, &WishlistOwner::User(user_id)).await
}

pub async fn find_by_session_id<C>(db: &C, session_id: &str) -> Result<Vec<wishlist::Model>, DbErr>
where
    C: ConnectionTrait,
{
    find_by_owner(db, &WishlistOwner::Session(session_id.to_string())).await
}

pub async fn find_by_owner<C>(db: &C, owner: &WishlistOwner) -> Result<Vec<wishlist::Model>, DbErr>
where
    C: ConnectionTrait,
{
    WishlistEntity::find()
        .filter(owner.condition())
        .order_by_desc(wishlist::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn find_entry<C>(
    db: &C,
    owner: &WishlistOwner,
    product_id: Uuid,
) -> Result<Option<wishlist::Model>, DbErr>
where
    C: ConnectionTrait,
{
    WishlistEntity::find()
        .filter(owner.condition())
        .filter(wishlist::Column::ProductId.eq(product_id))
        .one(db)
        .await
}

pub async fn insert<C>(
    db: &C,
    owner: &WishlistOwner,
    product_id: Uuid,
) -> Result<wishlist::Model, DbErr>
where
    C: ConnectionTrait,
{
    let (user_id, session_id) = match owner {
        WishlistOwner::User(user_id) => (Some(*user_id), None),
        WishlistOwner::Session(session_id) => (None, Some(session_id.clone())),
    };

    wishlist::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        session_id: Set(session_id),
        product_id: Set(product_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Deletes the row only if it belongs to `owner`.
pub async fn delete_entry<C>(db: &C, owner: &WishlistOwner, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = WishlistEntity::delete_many()
        .filter(wishlist::Column::Id.eq(id))
        .filter(owner.condition())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Hands the guest rows of `session_id` over to `user_id`. Products the user
/// already wishlisted are dropped from the guest list instead of duplicated.
/// Claimed rows lose their session so the guest list starts empty again.
pub async fn claim_session<C>(db: &C, session_id: &str, user_id: Uuid) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let owned: Vec<Uuid> = find_by_user_id(db, user_id)
        .await?
        .into_iter()
        .map(|entry| entry.product_id)
        .collect();
    let guest = WishlistOwner::Session(session_id.to_string());

    if !owned.is_empty() {
        WishlistEntity::delete_many()
            .filter(guest.condition())
            .filter(wishlist::Column::ProductId.is_in(owned))
            .exec(db)
            .await?;
    }

    let result = WishlistEntity::update_many()
        .col_expr(wishlist::Column::UserId, Expr::value(user_id))
        .col_expr(wishlist::Column::SessionId, Expr::value(Option::<String>::None))
        .filter(guest.condition())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
