use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connection settings for the catalog and course database
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub database_url: String,
    /// Upper bound on pooled connections; contraindication lookups of one
    /// request run concurrently and share this pool
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// `None` when `DATABASE_URL` is not set
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let Some(database_url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };

        let number = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid value for {}: {}", key, raw)),
                None => Ok(default),
            }
        };

        let max_connections = number("DB_MAX_CONNECTIONS", 10)?;
        if max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Some(DatabaseConfig {
            database_url,
            max_connections: u32::try_from(max_connections).context("DB_MAX_CONNECTIONS is too large")?,
            acquire_timeout: Duration::from_secs(number("DB_CONNECT_TIMEOUT", 5)?),
        }))
    }

    pub async fn create_pool(&self) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.database_url)
            .await
            .context("Failed to connect to the catalog database")
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}
