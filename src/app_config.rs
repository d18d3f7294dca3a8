/*!
 * Application configuration module.
 *
 * Configuration is assembled from the process environment (optionally seeded
 * from a `.env` file by the binary) and handed to the rest of the application
 * explicitly. Nothing reads the environment after startup.
 */

use anyhow::{Result, anyhow};
use std::env;
use std::time::Duration;

/// Represents the application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name used in logs
    pub app_name: String,

    /// Deployment environment label (production, development, ...)
    pub app_env: String,

    /// Whether debug logging is requested via the environment
    pub debug: bool,

    /// Translation service config
    pub translation: TranslationConfig,
}

/// Settings for the translation service and its pacing
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// API key for the Gemini service
    pub api_key: String,

    /// Model identifier (a leading "models/" prefix is tolerated)
    pub model: String,

    /// Service base URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum attempts per batch before it is abandoned
    pub retry_count: u32,

    /// Pause between retries of a failed batch, in milliseconds
    pub retry_delay_ms: u64,

    /// Rate limit in requests per minute, enforced by a post-success pause
    pub rate_limit: u32,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Config {
            app_name: env_or("APP_NAME", "dualsub"),
            app_env: env_or("APP_ENV", "production"),
            debug: parse_bool(&env_or("DEBUG", "false")),
            translation: TranslationConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env_or("GEMINI_MODEL", &default_model()),
                endpoint: env_or("GEMINI_ENDPOINT", &default_endpoint()),
                ..TranslationConfig::default()
            },
        }
    }

    /// Validate that the configuration can drive an API call
    pub fn validate(&self) -> Result<()> {
        if self.translation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "GEMINI_API_KEY is not set; export it or add it to a .env file"
            ));
        }
        if self.translation.model.trim().is_empty() {
            return Err(anyhow!("Model identifier must not be empty"));
        }
        Ok(())
    }

    /// Log level implied by the environment (the CLI may override it)
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

impl TranslationConfig {
    /// Pause between retries of a failed batch
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Pause after each successful batch, derived from the rate limit
    pub fn request_interval(&self) -> Duration {
        if self.rate_limit > 0 {
            Duration::from_millis(60_000 / u64::from(self.rate_limit))
        } else {
            Duration::ZERO
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: "dualsub".to_string(),
            app_env: "production".to_string(),
            debug: false,
            translation: TranslationConfig::default(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            rate_limit: default_rate_limit(),
        }
    }
}

/// Read an environment variable, falling back when unset or blank
fn env_or(key: &str, fallback: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Parse a boolean-ish environment value ("true"/"1", case-insensitive)
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}

// Default values for translation configuration
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.3
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_rate_limit() -> u32 {
    10
}
