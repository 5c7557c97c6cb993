use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::entities::product::{self, Entity as ProductEntity, Status};

pub struct NewProduct {
    pub product_group_id: Uuid,
    pub sku: String,
    pub variant_name: Option<String>,
    pub mrp: Option<i64>,
    pub selling_price: Option<i64>,
    pub attributes: Option<Json>,
    pub status: Status,
    pub stock_quantity: i32,
    pub is_default_variant: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// `Some(None)` on a price or on `attributes` clears the column.
#[derive(Default)]
pub struct ProductChanges {
    pub variant_name: Option<String>,
    pub mrp: Option<Option<i64>>,
    pub selling_price: Option<Option<i64>>,
    pub attributes: Option<Option<Json>>,
    pub status: Option<Status>,
    pub stock_quantity: Option<i32>,
    pub is_default_variant: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<product::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductEntity::find_by_id(id).one(db).await
}

pub async fn find_by_sku<C>(db: &C, sku: &str) -> Result<Option<product::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductEntity::find()
        .filter(product::Column::Sku.eq(sku))
        .one(db)
        .await
}

/// Variants of a group, default variant first.
pub async fn find_by_product_group_id<C>(
    db: &C,
    product_group_id: Uuid,
) -> Result<Vec<product::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductEntity::find()
        .filter(product::Column::ProductGroupId.eq(product_group_id))
        .order_by_desc(product::Column::IsDefaultVariant)
        .order_by_asc(product::Column::Sku)
        .all(db)
        .await
}

// A group has at most one default variant.
async fn clear_default_variant<C>(db: &C, product_group_id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    ProductEntity::update_many()
        .col_expr(product::Column::IsDefaultVariant, Expr::value(false))
        .filter(product::Column::ProductGroupId.eq(product_group_id))
        .filter(product::Column::IsDefaultVariant.eq(true))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn insert<C>(db: &C, new: NewProduct) -> Result<product::Model, DbErr>
where
    C: ConnectionTrait,
{
    if new.is_default_variant {
        clear_default_variant(db, new.product_group_id).await?;
    }

    let now = Utc::now();
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_group_id: Set(new.product_group_id),
        sku: Set(new.sku),
        variant_name: Set(new.variant_name),
        mrp: Set(new.mrp),
        selling_price: Set(new.selling_price),
        attributes: Set(new.attributes),
        status: Set(new.status),
        stock_quantity: Set(new.stock_quantity),
        is_default_variant: Set(new.is_default_variant),
        meta_title: Set(new.meta_title),
        meta_description: Set(new.meta_description),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn update<C>(
    db: &C,
    current: product::Model,
    changes: ProductChanges,
) -> Result<product::Model, DbErr>
where
    C: ConnectionTrait,
{
    if changes.is_default_variant == Some(true) && !current.is_default_variant {
        clear_default_variant(db, current.product_group_id).await?;
    }

    let mut model: product::ActiveModel = current.into();
    if let Some(variant_name) = changes.variant_name {
        model.variant_name = Set(Some(variant_name));
    }
    if let Some(mrp) = changes.mrp {
        model.mrp = Set(mrp);
    }
    if let Some(selling_price) = changes.selling_price {
        model.selling_price = Set(selling_price);
    }
    if let Some(attributes) = changes.attributes {
        model.attributes = Set(attributes);
    }
    if let Some(status) = changes.status {
        model.status = Set(status);
    }
    if let Some(stock_quantity) = changes.stock_quantity {
        model.stock_quantity = Set(stock_quantity);
    }
    if let Some(is_default_variant) = changes.is_default_variant {
        model.is_default_variant = Set(is_default_variant);
    }
    if let Some(meta_title) = changes.meta_title {
        model.meta_title = Set(Some(meta_title));
    }
    if let Some(meta_description) = changes.meta_description {
        model.meta_description = Set(Some(meta_description));
    }
    model.updated_at = Set(Utc::now());

    model.update(db).await
}

pub async fn delete_by_id<C>(db: &C, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = ProductEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
