use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_backend::{create_api_router, setup_schema, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let db: DatabaseConnection = Database::connect(&config.database_url).await?;
    setup_schema(&db).await?;

    let shared_db = Arc::new(db);
    let config = Arc::new(config);

    let app = create_api_router(shared_db, config.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Running at {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
