use sea_orm::entity::prelude::*;
use serde::Serialize;

pub use super::product_group::Status;

/// A purchasable variant of a product group, identified by its SKU.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub product_group_id: Uuid,
    #[sea_orm(unique, column_type = "String(StringLen::N(100))")]
    pub sku: String,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub variant_name: Option<String>,
    pub mrp: Option<i64>,
    pub selling_price: Option<i64>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub attributes: Option<Json>,
    pub status: Status,
    pub stock_quantity: i32,
    pub is_default_variant: bool,
    #[sea_orm(column_type = "String(StringLen::N(200))", nullable)]
    pub meta_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_group::Entity",
        from = "Column::ProductGroupId",
        to = "super::product_group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ProductGroup,
    #[sea_orm(has_many = "super::product_image::Entity")]
    ProductImage,
    #[sea_orm(has_many = "super::product_view::Entity")]
    ProductView,
    #[sea_orm(has_many = "super::wishlist::Entity")]
    Wishlist,
}

impl Related<super::product_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductGroup.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductImage.def()
    }
}

impl Related<super::product_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductView.def()
    }
}

impl Related<super::wishlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
