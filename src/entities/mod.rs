pub mod brand;
pub mod category;
pub mod category_brand;
pub mod otp_verification;
pub mod product;
pub mod product_group;
pub mod product_image;
pub mod product_view;
pub mod user;
pub mod wishlist;

use sea_orm::{
    sea_query::Index, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::info;

/// Creates every table (and its indexes) that does not exist yet.
/// Tables are created parents first so foreign keys resolve on every backend.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, brand::Entity).await?;
    create_table(db, &schema, category::Entity).await?;
    create_table(db, &schema, category_brand::Entity).await?;
    create_table(db, &schema, product_group::Entity).await?;
    create_table(db, &schema, product::Entity).await?;
    create_table(db, &schema, product_image::Entity).await?;
    create_table(db, &schema, product_view::Entity).await?;
    create_table(db, &schema, wishlist::Entity).await?;
    create_wishlist_owner_indexes(db).await?;
    create_table(db, &schema, otp_verification::Entity).await?;

    info!("Database schema is ready");
    Ok(())
}

/// One row per (owner, product). NULLs are distinct, so guest rows and
/// user rows never collide with each other.
async fn create_wishlist_owner_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let owners = [
        ("idx_wishlist_user_product", wishlist::Column::UserId),
        ("idx_wishlist_session_product", wishlist::Column::SessionId),
    ];

    for (name, owner) in owners {
        let index = Index::create()
            .name(name)
            .table(wishlist::Entity)
            .col(owner)
            .col(wishlist::Column::ProductId)
            .unique()
            .if_not_exists()
            .to_owned();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait + Copy,
{
    let backend = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}
