/*!
 * Tests for error types and quota classification
 */

use dualsub::errors::{ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_parseError_shouldDisplayCorrectly() {
    let error = ProviderError::ParseError("Invalid JSON".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Failed to parse API response"));
    assert!(display.contains("Invalid JSON"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Service unavailable".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Service unavailable"));
}

#[test]
fn test_isQuota_withQuotaExceeded_shouldReturnTrue() {
    let error = ProviderError::QuotaExceeded("daily limit reached".to_string());
    assert!(error.is_quota());
}

#[test]
fn test_isQuota_withStatus429_shouldReturnTrue() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    assert!(error.is_quota());
}

#[test]
fn test_isQuota_withQuotaSubstring_shouldMatchCaseInsensitively() {
    // Classification falls back to scanning the message
    assert!(ProviderError::RequestFailed("QUOTA exceeded for model".to_string()).is_quota());
    assert!(ProviderError::RequestFailed("server said 429".to_string()).is_quota());
    assert!(ProviderError::ParseError("Quota will reset at midnight".to_string()).is_quota());
}

#[test]
fn test_isQuota_withUnrelatedErrors_shouldReturnFalse() {
    assert!(!ProviderError::RequestFailed("Connection refused".to_string()).is_quota());
    assert!(!ProviderError::ParseError("Invalid JSON".to_string()).is_quota());
    assert!(
        !ProviderError::ApiError {
            status_code: 500,
            message: "Internal error".to_string(),
        }
        .is_quota()
    );
}

#[test]
fn test_translationError_invalidRange_shouldDisplayCorrectly() {
    let error =
        TranslationError::InvalidRange("start_from 11 selects no entries (upper bound 10)".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid batch range"));
    assert!(display.contains("start_from 11"));
}

#[test]
fn test_providerError_debug_shouldBeImplemented() {
    let error = ProviderError::RequestFailed("test".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("RequestFailed"));
}
