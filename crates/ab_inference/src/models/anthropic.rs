use std::fmt;
use std::time::Duration;

use ab_core::{CompletionModel, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Config;

const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

/// Messages API client.
pub struct AnthropicModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Auth("Claude API key is required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model_name: config.model_name().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

impl fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builds the caller-facing message for a failed call, keeping the provider's
/// own wording so "credit balance" and rate-limit texts stay matchable.
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            format!("{} ({}): {}", status, envelope.error.kind, envelope.error.message)
        }
        _ if body.trim().is_empty() => status.to_string(),
        _ => format!("{}: {}", status, body.trim()),
    }
}

#[async_trait]
impl CompletionModel for AnthropicModel {
    fn name(&self) -> &str {
        "Anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessageRequest {
            model: &self.model_name,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            model = %self.model_name,
            prompt_length = prompt.len(),
            "Calling Anthropic API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::ModelCall(format!("request timed out: {}", e))
                } else {
                    Error::ModelCall(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::ModelCall(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = describe_failure(status, &body);
            tracing::error!(model = %self.model_name, %status, "Anthropic API call failed: {}", message);
            return Err(Error::ModelCall(message));
        }

        let parsed: MessageResponse = serde_json::from_str(&body)
            .map_err(|e| Error::ModelCall(format!("unexpected response shape: {}", e)))?;

        match parsed.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => {
                tracing::debug!(
                    model = %self.model_name,
                    response_length = text.len(),
                    "Anthropic API response received"
                );
                Ok(text)
            }
            Some(ContentBlock::Other) => Err(Error::ModelCall("Unexpected response type".to_string())),
            None => Err(Error::ModelCall("response contained no content".to_string())),
        }
    }
}
