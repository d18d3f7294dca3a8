use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::{Generation, Provider};

/// Gemini client for the generateContent REST API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Model identifier, without the "models/" prefix
    model: String,
    /// Sampling temperature applied to every request
    temperature: Option<f32>,
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation content
    contents: Vec<Content>,

    /// Generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content block of a request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    /// Role of the block (user, model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts; the API returns none for blocked candidates
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Text part of a content block
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    /// The text payload
    #[serde(default)]
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body of generateContent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate generations; the first one carries the reply
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Token accounting reported by the API
    pub usage_metadata: Option<UsageMetadata>,
}

/// One candidate generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when the candidate was blocked
    pub content: Option<Content>,

    /// Why generation stopped (STOP, MAX_TOKENS, SAFETY, ...)
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens in the candidates
    #[serde(default)]
    pub candidates_token_count: u64,
}

/// One entry of the models listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Fully-qualified model name (models/gemini-...)
    pub name: String,

    /// Human-readable model name
    #[serde(default)]
    pub display_name: String,

    /// Operations the model supports (generateContent, embedContent, ...)
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether this model can serve generateContent requests
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == "generateContent")
    }
}

/// Paged response of the models listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl GenerateContentRequest {
    /// Create a request carrying one user prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

impl Gemini {
    /// Create a client from the translation configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            // The SDK-style "models/gemini-..." spelling is accepted too
            model: config
                .model
                .strip_prefix("models/")
                .unwrap_or(&config.model)
                .to_string(),
            temperature: Some(config.temperature),
        }
    }

    /// Complete a generateContent request
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let api_url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::RequestFailed(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(Self::error_from_status(status, error_text));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse Gemini API response: {}", e))
            })
    }

    /// List the models available to this API key
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let api_url = format!("{}/v1beta/models", self.endpoint);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&api_url)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "200")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(|e| {
                ProviderError::RequestFailed(format!("Failed to list Gemini models: {}", e))
            })?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to get error response text".to_string());
                error!("Gemini API error ({}): {}", status, error_text);
                return Err(Self::error_from_status(status, error_text));
            }

            let page = response.json::<ModelListResponse>().await.map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse model listing: {}", e))
            })?;

            models.extend(page.models);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    /// Extract the reply text from a response
    pub fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Map a non-success HTTP status onto the error taxonomy.
    /// 429 and RESOURCE_EXHAUSTED bodies mean the quota is used up.
    fn error_from_status(status: StatusCode, error_text: String) -> ProviderError {
        if status == StatusCode::TOO_MANY_REQUESTS || error_text.contains("RESOURCE_EXHAUSTED") {
            ProviderError::QuotaExceeded(format!("{}: {}", status, error_text))
        } else {
            ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            }
        }
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The API key stays out of debug output
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError> {
        let mut request = GenerateContentRequest::from_prompt(prompt);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        let response = self.generate_content(request).await?;
        let text = Self::extract_text(&response);
        if text.trim().is_empty() {
            // Blocked or empty candidates surface as a retryable failure
            let reason = response
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ProviderError::ParseError(format!(
                "Response contained no text ({})",
                reason
            )));
        }

        Ok(Generation {
            text,
            prompt_tokens: response
                .usage_metadata
                .map(|usage| usage.prompt_token_count),
            completion_tokens: response
                .usage_metadata
                .map(|usage| usage.candidates_token_count),
        })
    }
}
