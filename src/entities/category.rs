use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A node of the catalog tree. `path` is the `/`-joined slug chain from the
/// root and `level` its depth, both kept in sync by `repository::category`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(unique, column_type = "String(StringLen::N(100))")]
    pub slug: String,
    #[sea_orm(indexed, nullable)]
    pub parent_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub path: String,
    pub level: i32,
    pub display_order: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub icon_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(has_many = "super::product_group::Entity")]
    ProductGroup,
    #[sea_orm(has_many = "super::category_brand::Entity")]
    CategoryBrand,
}

impl Related<Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl Related<super::product_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductGroup.def()
    }
}

impl Related<super::category_brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryBrand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
