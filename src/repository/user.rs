use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::user::{self, Entity as UserEntity, Role};

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<user::Model>, DbErr>
where
    C: ConnectionTrait,
{
    UserEntity::find_by_id(id).one(db).await
}

pub async fn find_by_phone<C>(db: &C, phone: &str) -> Result<Option<user::Model>, DbErr>
where
    C: ConnectionTrait,
{
    UserEntity::find()
        .filter(user::Column::Phone.eq(phone))
        .one(db)
        .await
}

pub async fn insert<C>(db: &C, phone: &str, role: Role) -> Result<user::Model, DbErr>
where
    C: ConnectionTrait,
{
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        phone: Set(phone.to_string()),
        name: Set(None),
        role: Set(role),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Returns the user registered with `phone`, creating it with `role` first
/// if needed. An existing user keeps its role unless `role` is admin.
pub async fn find_or_create_by_phone<C>(db: &C, phone: &str, role: Role) -> Result<user::Model, DbErr>
where
    C: ConnectionTrait,
{
    match find_by_phone(db, phone).await? {
        Some(existing) if role == Role::Admin && existing.role != Role::Admin => {
            let mut model: user::ActiveModel = existing.into();
            model.role = Set(Role::Admin);
            model.update(db).await
        }
        Some(existing) => Ok(existing),
        None => insert(db, phone, role).await,
    }
}
