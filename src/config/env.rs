// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::services::ServiceOptions;
use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Table (collection) holding reviews
    pub reviews_table: String,

    /// Table (collection) owned by the user collaborator
    pub users_table: String,

    /// Store-assigned created_at / updated_at
    pub record_timestamps: bool,

    /// Look up authors on write and warn when missing (never blocks the write)
    pub verify_authors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            reviews_table: "reviews".to_string(),
            users_table: "users".to_string(),
            record_timestamps: true,
            verify_authors: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),

            reviews_table: lookup("REVIEWS_TABLE").unwrap_or(defaults.reviews_table),

            users_table: lookup("USERS_TABLE").unwrap_or(defaults.users_table),

            record_timestamps: lookup("REVIEW_TIMESTAMPS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.record_timestamps),

            verify_authors: lookup("VERIFY_AUTHORS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.verify_authors),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Table names are interpolated into SQL, so only plain
    /// identifiers are accepted
    pub fn validate(&self) -> Result<(), String> {
        for (key, table) in [
            ("REVIEWS_TABLE", &self.reviews_table),
            ("USERS_TABLE", &self.users_table),
        ] {
            if !is_sql_identifier(table) {
                return Err(format!("{} must be a plain SQL identifier, got {:?}", key, table));
            }
        }

        if self.verify_authors {
            log::info!("Author verification enabled - missing authors are logged, not rejected");
        }

        Ok(())
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            verify_authors: self.verify_authors,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("Ignoring unrecognised boolean value: {}", value);
            None
        }
    }
}

fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
