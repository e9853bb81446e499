use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use rehab_course_composer::api::courses::CourseAppState;
use rehab_course_composer::api::routes::create_routes;
use rehab_course_composer::catalog::{CatalogReader, PgCatalog};
use rehab_course_composer::config::{demo_catalog, run_migrations, AppConfig, CatalogSeeder, DatabaseConfig};
use rehab_course_composer::services::{CourseComposerService, CourseRecordService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    rehab_course_composer::init_tracing(&config.log_level);

    let (catalog, records): (Arc<dyn CatalogReader>, Option<CourseRecordService>) =
        match DatabaseConfig::from_env()? {
            Some(db_config) => {
                let pool = db_config.create_pool().await?;
                if config.run_migrations {
                    run_migrations(&pool).await?;
                    info!("Database migrations applied");
                }
                if config.seed_demo_catalog {
                    CatalogSeeder::new(pool.clone()).seed_catalog(&demo_catalog()).await?;
                }
                info!("Using PostgreSQL exercise catalog");
                let catalog: Arc<dyn CatalogReader> = Arc::new(PgCatalog::new(pool.clone()));
                (catalog, Some(CourseRecordService::new(pool)))
            }
            None => {
                warn!("DATABASE_URL not set; serving the demo catalog with course saving disabled");
                let catalog: Arc<dyn CatalogReader> = Arc::new(demo_catalog());
                (catalog, None)
            }
        };

    let composer = CourseComposerService::with_settings(catalog, config.composer_settings());
    let app = create_routes(CourseAppState::new(composer, records));

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Course composer starting on http://{} ({})", address, config.environment);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
