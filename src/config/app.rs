use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::composer::{ComposerSettings, TimeBudgetConfig};

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", key, value)),
        _ => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub warmup_minutes: u32,
    pub cooldown_minutes: u32,
    pub default_session_minutes: u32,
    pub run_migrations: bool,
    pub seed_demo_catalog: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", 3000)?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let warmup_minutes = env_or("WARMUP_MINUTES", 10)?;
        let cooldown_minutes = env_or("COOLDOWN_MINUTES", 10)?;
        let default_session_minutes = env_or("DEFAULT_SESSION_MINUTES", 90)?;
        crate::models::validate_session_minutes(default_session_minutes)
            .map_err(anyhow::Error::msg)
            .context("DEFAULT_SESSION_MINUTES")?;

        if warmup_minutes + cooldown_minutes >= 60 {
            anyhow::bail!(
                "WARMUP_MINUTES + COOLDOWN_MINUTES must leave time for the main section of a 60 minute session"
            );
        }

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            warmup_minutes,
            cooldown_minutes,
            default_session_minutes,
            run_migrations: env_flag("RUN_MIGRATIONS"),
            seed_demo_catalog: env_flag("SEED_DEMO_CATALOG"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            budgets: TimeBudgetConfig {
                warmup_minutes: self.warmup_minutes,
                cooldown_minutes: self.cooldown_minutes,
                ..TimeBudgetConfig::default()
            },
            default_session_minutes: self.default_session_minutes,
            ..ComposerSettings::default()
        }
    }
}
