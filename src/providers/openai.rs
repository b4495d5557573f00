use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::{backoff_delay_ms, LlmConfig};
use crate::correction::prompts::{fingerprint, CorrectionPromptBuilder};
use crate::correction::{Chunk, CorrectionResponse};
use crate::errors::ProviderError;
use crate::providers::Corrector;

/// Corrector backed by an OpenAI-compatible chat completions API
#[derive(Debug)]
pub struct LlmCorrector {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication, empty for local servers
    api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    /// Per-request timeout in seconds
    timeout_secs: u64,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    custom_instructions: Option<String>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Extract text from the first choice
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

impl LlmCorrector {
    /// Create a corrector from the provider settings and a resolved key
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: config.get_endpoint(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
            custom_instructions: None,
        }
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    fn build_request(&self, system: String, user: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system },
                ChatMessage { role: "user".to_string(), content: user },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { format_type: "json_object".to_string() },
        }
    }

    /// Send one request, mapping failures onto `ProviderError`
    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut builder = self.client.post(self.api_url()).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::ConnectionError(format!("Failed to send request: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(error_text),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: error_text,
                },
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse chat response: {}", e)))
    }

    /// Send with retry on transient failures
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut attempt = 0;

        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    error!("Correction API error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    attempt += 1;
                    // Exponential backoff
                    let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt - 1);
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => {
                    error!("Correction API error: {}", e);
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl Corrector for LlmCorrector {
    async fn correct(&self, chunk: &Chunk) -> Result<CorrectionResponse, ProviderError> {
        let mut builder = CorrectionPromptBuilder::new().with_chunk(chunk);
        if let Some(instructions) = &self.custom_instructions {
            builder = builder.with_custom_instructions(instructions);
        }
        let (system, user) = builder.build();
        let prompt_hash = fingerprint(&user);

        info!(
            "Correcting chunk lines {}-{}, errors: {:?}, prompt_hash: {}",
            chunk.start_line + 1,
            chunk.end_line + 1,
            chunk.error_codes(),
            prompt_hash
        );

        let response = self.complete(&self.build_request(system, user)).await?;
        if let Some(usage) = &response.usage {
            debug!("Tokens: {} prompt, {} completion", usage.prompt_tokens, usage.completion_tokens);
        }

        let text = response
            .text()
            .ok_or_else(|| ProviderError::ParseError("Response has no choices".to_string()))?;
        let mut correction = CorrectionResponse::from_json(text)?;
        correction.model = format!("{}@{}", self.model, prompt_hash);

        info!(
            "Chunk returned {} fix(es), avg confidence {:.2}",
            correction.fixes.len(),
            correction.average_confidence()
        );
        Ok(correction)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
