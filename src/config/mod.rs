/// Application configuration loaded from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Superuser configuration from environment variables
pub mod users;

pub use app::{AppConfig, ColorPropertyConfig, load_config, load_default_config};
