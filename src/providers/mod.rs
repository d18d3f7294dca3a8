/*!
 * Providers for the remote text-generation service.
 *
 * This module contains the client for the Gemini generateContent API and a
 * scripted mock used by the test suites. The translation pipeline depends
 * only on the `Provider` trait: one prompt in, one generation out.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Text produced by a provider for one prompt
#[derive(Debug, Clone)]
pub struct Generation {
    /// The generated text
    pub text: String,

    /// Prompt token count, when the API reports one
    pub prompt_tokens: Option<u64>,

    /// Completion token count, when the API reports one
    pub completion_tokens: Option<u64>,
}

/// Common trait for text-generation providers
///
/// The pipeline issues exactly one call per batch through this trait and
/// classifies failures via `ProviderError` (quota vs everything else).
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Provider label used in logs and run summaries
    fn name(&self) -> &str;

    /// Model identifier used in run summaries
    fn model(&self) -> &str;

    /// Generate text for a prompt
    ///
    /// # Arguments
    /// * `prompt` - The full prompt to send
    ///
    /// # Returns
    /// * `Result<Generation, ProviderError>` - The generated text or a classified error
    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError>;
}

pub mod gemini;
pub mod mock;
