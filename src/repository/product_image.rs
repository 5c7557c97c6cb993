use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::product_image::{self, Entity as ProductImageEntity, ImageType};

pub struct NewProductImage {
    pub product_id: Uuid,
    pub cloudinary_url: String,
    pub alt_text: Option<String>,
    pub display_order: i32,
    pub image_type: ImageType,
    pub is_primary: bool,
}

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<product_image::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductImageEntity::find_by_id(id).one(db).await
}

pub async fn find_by_product_id<C>(
    db: &C,
    product_id: Uuid,
) -> Result<Vec<product_image::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductImageEntity::find()
        .filter(product_image::Column::ProductId.eq(product_id))
        .order_by_asc(product_image::Column::DisplayOrder)
        .order_by_asc(product_image::Column::CreatedAt)
        .all(db)
        .await
}

/// Inserts an image. A new primary image demotes the previous one, so run
/// this inside a transaction.
pub async fn insert<C>(db: &C, new: NewProductImage) -> Result<product_image::Model, DbErr>
where
    C: ConnectionTrait,
{
    if new.is_primary {
        ProductImageEntity::update_many()
            .col_expr(product_image::Column::IsPrimary, Expr::value(false))
            .filter(product_image::Column::ProductId.eq(new.product_id))
            .filter(product_image::Column::IsPrimary.eq(true))
            .exec(db)
            .await?;
    }

    product_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(new.product_id),
        cloudinary_url: Set(new.cloudinary_url),
        alt_text: Set(new.alt_text),
        display_order: Set(new.display_order),
        image_type: Set(new.image_type),
        is_primary: Set(new.is_primary),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

pub async fn delete_by_id<C>(db: &C, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = ProductImageEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
