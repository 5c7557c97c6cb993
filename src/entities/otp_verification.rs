use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "otp_verifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(15))", indexed)]
    pub phone: String,
    #[sea_orm(column_type = "String(StringLen::N(6))")]
    #[serde(skip_serializing)]
    pub otp_code: String,
    pub purpose: Purpose,
    pub attempts: i32,
    pub is_verified: bool,
    pub expires_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "otp_purpose_enum",
    db_type = "String(StringLen::N(20))",
    rs_type = "String"
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    #[default]
    #[sea_orm(string_value = "LOGIN")]
    Login,
    #[sea_orm(string_value = "SIGNUP")]
    Signup,
}
