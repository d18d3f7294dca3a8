/*!
 * # dualsub - Dual-language subtitle translation
 *
 * A Rust library for translating SRT subtitle files with Gemini while keeping
 * the original text, so every entry shows both languages.
 *
 * ## Features
 *
 * - Parse and write SRT subtitle files
 * - Translate entries in batches through the Gemini API
 * - Keep the original line and add the translation in a colored font tag
 * - Save progress after every batch and resume interrupted runs
 * - Fixed retries for transient errors, immediate stop on quota exhaustion
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file handling and processing
 * - `translation`: Batch translation machinery:
 *   - `translation::batch`: Batch planning over the entry list
 *   - `translation::codec`: Prompt encoding and response decoding
 *   - `translation::pipeline`: Sequential request loop with retries
 *   - `translation::progress`: Per-batch output persistence
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Deterministic provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use translation::{BatchPlan, RunReport, TranslationPipeline};
pub use language_utils::resolve_language_name;
pub use errors::{ProviderError, TranslationError};
