use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::product_group::{self, Entity as ProductGroupEntity, Status};

pub struct NewProductGroup {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub base_price: Option<i64>,
    pub search_keywords: Option<String>,
    pub status: Status,
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Default)]
pub struct ProductGroupChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Uuid>,
    /// `Some(None)` detaches the group from its brand.
    pub brand_id: Option<Option<Uuid>>,
    pub base_price: Option<i64>,
    pub search_keywords: Option<String>,
    pub status: Option<Status>,
    pub is_featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Default, Debug, Clone)]
pub struct ProductGroupFilter {
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub featured_only: bool,
    pub status: Option<Status>,
}

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<product_group::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductGroupEntity::find_by_id(id).one(db).await
}

pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<product_group::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ProductGroupEntity::find()
        .filter(product_group::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn find_by_category_id<C>(
    db: &C,
    category_id: Uuid,
) -> Result<Vec<product_group::Model>, DbErr>
where
    C: ConnectionTrait,
{
    find_filtered(
        db,
        &ProductGroupFilter {
            category_id: Some(category_id),
            ..Default::default()
        },
    )
    .await
}

pub async fn find_by_brand_id<C>(db: &C, brand_id: Uuid) -> Result<Vec<product_group::Model>, DbErr>
where
    C: ConnectionTrait,
{
    find_filtered(
        db,
        &ProductGroupFilter {
            brand_id: Some(brand_id),
            ..Default::default()
        },
    )
    .await
}

pub async fn find_filtered<C>(
    db: &C,
    filter: &ProductGroupFilter,
) -> Result<Vec<product_group::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut condition = Condition::all();

    if let Some(category_id) = filter.category_id {
        condition = condition.add(product_group::Column::CategoryId.eq(category_id));
    }
    if let Some(brand_id) = filter.brand_id {
        condition = condition.add(product_group::Column::BrandId.eq(brand_id));
    }
    if filter.featured_only {
        condition = condition.add(product_group::Column::IsFeatured.eq(true));
    }
    if let Some(status) = filter.status {
        condition = condition.add(product_group::Column::Status.eq(status));
    }

    ProductGroupEntity::find()
        .filter(condition)
        .order_by_asc(product_group::Column::Name)
        .all(db)
        .await
}

pub async fn insert<C>(db: &C, new: NewProductGroup) -> Result<product_group::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    product_group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        slug: Set(new.slug),
        description: Set(new.description),
        category_id: Set(new.category_id),
        brand_id: Set(new.brand_id),
        base_price: Set(new.base_price),
        search_keywords: Set(new.search_keywords),
        status: Set(new.status),
        is_featured: Set(new.is_featured),
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
    current: product_group::Model,
    changes: ProductGroupChanges,
) -> Result<product_group::Model, DbErr>
where
    C: ConnectionTrait,
{
    let mut model: product_group::ActiveModel = current.into();

    if let Some(name) = changes.name {
        model.name = Set(name);
    }
    if let Some(slug) = changes.slug {
        model.slug = Set(slug);
    }
    if let Some(description) = changes.description {
        model.description = Set(description);
    }
    if let Some(category_id) = changes.category_id {
        model.category_id = Set(category_id);
    }
    if let Some(brand_id) = changes.brand_id {
        model.brand_id = Set(brand_id);
    }
    if let Some(base_price) = changes.base_price {
        model.base_price = Set(Some(base_price));
    }
    if let Some(search_keywords) = changes.search_keywords {
        model.search_keywords = Set(Some(search_keywords));
    }
    if let Some(status) = changes.status {
        model.status = Set(status);
    }
    if let Some(is_featured) = changes.is_featured {
        model.is_featured = Set(is_featured);
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
    let result = ProductGroupEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
