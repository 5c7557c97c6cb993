use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::brand::{self, Entity as BrandEntity};

pub struct NewBrand {
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<brand::Model>, DbErr>
where
    C: ConnectionTrait,
{
    BrandEntity::find_by_id(id).one(db).await
}

pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<brand::Model>, DbErr>
where
    C: ConnectionTrait,
{
    BrandEntity::find()
        .filter(brand::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn find_all_active<C>(db: &C) -> Result<Vec<brand::Model>, DbErr>
where
    C: ConnectionTrait,
{
    BrandEntity::find()
        .filter(brand::Column::IsActive.eq(true))
        .order_by_asc(brand::Column::Name)
        .all(db)
        .await
}

pub async fn insert<C>(db: &C, new: NewBrand) -> Result<brand::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    brand::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        slug: Set(new.slug),
        logo_url: Set(new.logo_url),
        description: Set(new.description),
        is_active: Set(new.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn delete_by_id<C>(db: &C, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = BrandEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
