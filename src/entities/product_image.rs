use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "product_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub product_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub cloudinary_url: String,
    #[sea_orm(column_type = "String(StringLen::N(200))", nullable)]
    pub alt_text: Option<String>,
    pub display_order: i32,
    pub image_type: ImageType,
    pub is_primary: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "image_type_enum",
    db_type = "String(StringLen::N(20))",
    rs_type = "String"
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    #[sea_orm(string_value = "PRODUCT")]
    Product,
    #[sea_orm(string_value = "THUMBNAIL")]
    Thumbnail,
    #[sea_orm(string_value = "GALLERY")]
    Gallery,
}
