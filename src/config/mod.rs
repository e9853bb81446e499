// Environment configuration and demo data

pub mod app;
pub mod database;
pub mod seeding;

pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use seeding::{demo_catalog, CatalogSeeder};
