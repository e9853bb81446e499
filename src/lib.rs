pub mod api;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod models;
pub mod services;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
