//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use family_loop_core::{filter::MAIN_LIST_CAP, FilterPolicy, MatchMode};
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` keeps everything in memory for the lifetime of the process.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub contact_cap: usize,
    pub match_mode: MatchMode,
    pub openai_api_key: Option<String>,
    pub message_model: String,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            log_level: Level::INFO,
            contact_cap: MAIN_LIST_CAP,
            match_mode: MatchMode::default(),
            openai_api_key: None,
            message_model: "gpt-4o-mini".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Load Server and Database Settings ---
        let bind_address = match std::env::var("BIND_ADDRESS") {
            Ok(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            Err(_) => defaults.bind_address,
        };

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Pipeline Settings ---
        let contact_cap = match std::env::var("CONTACT_CAP") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("CONTACT_CAP".to_string(), e.to_string())
            })?,
            Err(_) => defaults.contact_cap,
        };

        let match_mode = match std::env::var("MATCH_MODE") {
            Ok(raw) => raw.parse::<MatchMode>().map_err(|e| {
                ConfigError::InvalidValue("MATCH_MODE".to_string(), e.to_string())
            })?,
            Err(_) => defaults.match_mode,
        };

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let message_model = std::env::var("MESSAGE_MODEL").unwrap_or(defaults.message_model);
        let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            contact_cap,
            match_mode,
            openai_api_key,
            message_model,
            cors_origin,
        })
    }

    /// The filter policy used when importing a contact list.
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::with_cap(self.contact_cap).match_mode(self.match_mode)
    }
}
