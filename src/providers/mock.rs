/*!
 * Mock provider for testing.
 *
 * Scripted behaviors for exercising the pipeline without a network:
 * - `MockProvider::echo()` - Well-formed tagged response for every prompt
 * - `MockProvider::failing()` - Always fails with a server error
 * - `MockProvider::quota_limited()` - Always fails with a quota error
 * - `MockProvider::quota_after(n)` - Echoes n times, then hits its quota
 * - `MockProvider::fail_then_succeed(n)` - Errors n times, then echoes
 */

// Allow dead code - the scripted behaviors are for the test suites
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{Generation, Provider};
use crate::translation::codec;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answer every tag in the prompt with a marked copy of its text
    Echo,
    /// Answer only the first `keep` tags
    MissingTags { keep: usize },
    /// Answer with free text carrying no tags at all
    Untagged,
    /// Fail `failures` times with a server error, then echo
    FailThenSucceed { failures: usize },
    /// Always fail with a server error
    Failing,
    /// Always fail with a quota error
    QuotaLimited,
    /// Echo `successes` times, then fail with a quota error
    QuotaAfter { successes: usize },
}

/// Mock provider with a scripted behavior and a shared request counter
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Requests seen so far, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator taking the prompt (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a mock that echoes every prompt tag back translated
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that answers only the first `keep` tags
    pub fn missing_tags(keep: usize) -> Self {
        Self::new(MockBehavior::MissingTags { keep })
    }

    /// Create a mock that answers with untagged free text
    pub fn untagged() -> Self {
        Self::new(MockBehavior::Untagged)
    }

    /// Create a mock that fails `failures` times before echoing
    pub fn fail_then_succeed(failures: usize) -> Self {
        Self::new(MockBehavior::FailThenSucceed { failures })
    }

    /// Create a mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that always reports an exhausted quota
    pub fn quota_limited() -> Self {
        Self::new(MockBehavior::QuotaLimited)
    }

    /// Create a mock that echoes `successes` times before hitting its quota
    pub fn quota_after(successes: usize) -> Self {
        Self::new(MockBehavior::QuotaAfter { successes })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of generate calls the mock has served
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Tagged response answering the first `keep` prompt tags.
    /// The prompt embeds the batch as `[N]` blocks, so decoding it
    /// recovers the original entry texts.
    fn echo_response(prompt: &str, keep: usize) -> String {
        let originals = codec::decode_response(prompt);
        originals
            .iter()
            .take(keep)
            .enumerate()
            .map(|(i, text)| format!("[{}] [TRANSLATED] {}\n", i + 1, text.replace('\n', " ")))
            .collect()
    }

    fn server_error(count: usize) -> ProviderError {
        ProviderError::ApiError {
            status_code: 503,
            message: format!("Simulated server failure (request #{})", count + 1),
        }
    }

    fn quota_error() -> ProviderError {
        ProviderError::QuotaExceeded("429 Too Many Requests: RESOURCE_EXHAUSTED".to_string())
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        if let Some(generator) = self.custom_response {
            return Ok(Generation {
                text: generator(prompt),
                prompt_tokens: None,
                completion_tokens: None,
            });
        }

        match self.behavior {
            MockBehavior::Echo => Ok(Generation {
                text: Self::echo_response(prompt, usize::MAX),
                prompt_tokens: Some(prompt.len() as u64),
                completion_tokens: Some((prompt.len() / 2) as u64),
            }),

            MockBehavior::MissingTags { keep } => Ok(Generation {
                text: Self::echo_response(prompt, keep),
                prompt_tokens: Some(10),
                completion_tokens: Some(10),
            }),

            MockBehavior::Untagged => Ok(Generation {
                text: "Sure! Here are the translations you asked for.".to_string(),
                prompt_tokens: Some(10),
                completion_tokens: Some(10),
            }),

            MockBehavior::FailThenSucceed { failures } => {
                if count < failures {
                    Err(Self::server_error(count))
                } else {
                    Ok(Generation {
                        text: Self::echo_response(prompt, usize::MAX),
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::Failing => Err(Self::server_error(count)),

            MockBehavior::QuotaLimited => Err(Self::quota_error()),

            MockBehavior::QuotaAfter { successes } => {
                if count < successes {
                    Ok(Generation {
                        text: Self::echo_response(prompt, usize::MAX),
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                } else {
                    Err(Self::quota_error())
                }
            }
        }
    }
}
