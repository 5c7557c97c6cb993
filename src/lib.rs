pub mod api;
pub mod config;
pub mod entities;
pub mod middleware;
pub mod repository;

pub use api::create_api_router;
pub use config::AppConfig;
pub use entities::setup_schema;
