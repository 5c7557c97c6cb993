use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{
    brand,
    category_brand::{self, Entity as CategoryBrandEntity},
    product_group,
};

pub async fn find_by_category_id<C>(
    db: &C,
    category_id: Uuid,
) -> Result<Vec<(category_brand::Model, Option<brand::Model>)>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryBrandEntity::find()
        .filter(category_brand::Column::CategoryId.eq(category_id))
        .find_also_related(brand::Entity)
        .order_by_desc(category_brand::Column::ProductCount)
        .all(db)
        .await
}

pub async fn find_by_id<C>(
    db: &C,
    category_id: Uuid,
    brand_id: Uuid,
) -> Result<Option<category_brand::Model>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryBrandEntity::find_by_id((category_id, brand_id))
        .one(db)
        .await
}

/// Recounts product groups per (category, brand) and replaces every
/// aggregate row. Returns the number of rows written. Run inside a
/// transaction so readers never see the table half empty.
pub async fn refresh<C>(db: &C) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    let counts: Vec<(Uuid, Option<Uuid>, i64)> = product_group::Entity::find()
        .select_only()
        .column(product_group::Column::CategoryId)
        .column(product_group::Column::BrandId)
        .column_as(Expr::col(product_group::Column::Id).count(), "product_count")
        .filter(product_group::Column::BrandId.is_not_null())
        .group_by(product_group::Column::CategoryId)
        .group_by(product_group::Column::BrandId)
        .into_tuple()
        .all(db)
        .await?;

    CategoryBrandEntity::delete_many().exec(db).await?;

    let now = Utc::now();
    let rows: Vec<category_brand::ActiveModel> = counts
        .into_iter()
        .filter_map(|(category_id, brand_id, count)| {
            brand_id.map(|brand_id| category_brand::ActiveModel {
                category_id: Set(category_id),
                brand_id: Set(brand_id),
                product_count: Set(i32::try_from(count).unwrap_or(i32::MAX)),
                last_updated: Set(now),
            })
        })
        .collect();

    let written = rows.len();
    if !rows.is_empty() {
        CategoryBrandEntity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
    }
    Ok(written)
}
