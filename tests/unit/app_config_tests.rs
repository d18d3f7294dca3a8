/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use dualsub::app_config::{Config, TranslationConfig, parse_bool};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.app_name, "dualsub");
    assert_eq!(config.app_env, "production");
    assert!(!config.debug);

    assert_eq!(config.translation.model, "gemini-2.5-flash");
    assert_eq!(
        config.translation.endpoint,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_delay_ms, 5000);
    assert_eq!(config.translation.rate_limit, 10);
    assert!(config.translation.temperature >= 0.0 && config.translation.temperature <= 1.0);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // Default config has no API key
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("GEMINI_API_KEY"));

    // With a key it passes
    config.translation.api_key = "test-api-key".to_string();
    assert!(config.validate().is_ok());

    // A whitespace-only key still fails
    config.translation.api_key = "   ".to_string();
    assert!(config.validate().is_err());

    // An empty model fails
    config.translation.api_key = "test-api-key".to_string();
    config.translation.model = String::new();
    assert!(config.validate().is_err());
}

/// Test pacing values derived from the translation config
#[test]
fn test_pacing_withConfiguredRateLimit_shouldDeriveIntervals() {
    let mut translation = TranslationConfig::default();

    // 10 requests per minute leaves 6 seconds between requests
    assert_eq!(translation.request_interval(), Duration::from_millis(6000));
    assert_eq!(translation.retry_delay(), Duration::from_millis(5000));

    translation.rate_limit = 30;
    assert_eq!(translation.request_interval(), Duration::from_millis(2000));

    // No rate limit means no pause
    translation.rate_limit = 0;
    assert_eq!(translation.request_interval(), Duration::ZERO);
}

/// Test log level selection from the debug flag
#[test]
fn test_log_level_withDebugFlag_shouldRaiseLevel() {
    let mut config = Config::default();
    assert_eq!(config.log_level(), log::LevelFilter::Info);

    config.debug = true;
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
}

/// Test boolean environment value parsing
#[test]
fn test_parse_bool_withVariousValues_shouldMatchTruthy() {
    assert!(parse_bool("true"));
    assert!(parse_bool("TRUE"));
    assert!(parse_bool("1"));
    assert!(parse_bool(" true "));
    assert!(!parse_bool("false"));
    assert!(!parse_bool("0"));
    assert!(!parse_bool("yes"));
    assert!(!parse_bool(""));
}
