use chrono::NaiveDate;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::product_view::{self, Entity as ProductViewEntity};

/// Counts one view of `product_id` on `day`: the first view of the day
/// inserts a row with `view_count = 1`, later ones increment it.
pub async fn record_view<C>(db: &C, product_id: Uuid, day: NaiveDate) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let row = product_view::ActiveModel {
        product_id: Set(product_id),
        viewed_at: Set(day),
        view_count: Set(1),
    };

    ProductViewEntity::insert(row)
        .on_conflict(
            OnConflict::columns([product_view::Column::ProductId, product_view::Column::ViewedAt])
                .value(
                    product_view::Column::ViewCount,
                    Expr::col((ProductViewEntity, product_view::Column::ViewCount)).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn find_by_id<C>(
    db: &C,
    product_id: Uuid,
    day: NaiveDate,
) -> Result<Option<product_view::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductViewEntity::find_by_id((product_id, day)).one(db).await
}

/// Daily counters of a product, most recent day first.
pub async fn find_by_product_id<C>(
    db: &C,
    product_id: Uuid,
) -> Result<Vec<product_view::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductViewEntity::find()
        .filter(product_view::Column::ProductId.eq(product_id))
        .order_by_desc(product_view::Column::ViewedAt)
        .all(db)
        .await
}
