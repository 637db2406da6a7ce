//! HTTP client for the chat-completions endpoint.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{GenerationError, Result};
use crate::request::{GenerationRequest, MAX_OUTPUT_TOKENS};

/// Client for an OpenAI-compatible chat-completions service.
pub struct GenerationClient {
    /// Bearer token.
    token: String,

    /// API base URL.
    endpoint: String,

    /// Model identifier.
    model: String,

    /// Per-request timeout.
    timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl GenerationClient {
    /// Create a client against the default endpoint and model.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: "https://models.github.ai/inference".to_string(),
            model: "openai/gpt-4.1".to_string(),
            timeout: Duration::from_secs(120),
            client: reqwest::Client::new(),
        }
    }

    /// Set the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a generation request and return the generated text.
    ///
    /// Failures come back classified (authentication, permission, endpoint,
    /// timeout, transport, malformed response) and are never retried or
    /// recovered here.
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let body = serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_output_tokens.min(MAX_OUTPUT_TOKENS),
            "top_p": request.params.top_p,
            "frequency_penalty": request.params.frequency_penalty,
            "presence_penalty": request.params.presence_penalty,
        });

        debug!("posting generation request to {url}");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        endpoint: url.clone(),
                    }
                } else {
                    GenerationError::Transport {
                        endpoint: url.clone(),
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = excerpt(&response.text().await.unwrap_or_default());
            return Err(match status.as_u16() {
                401 => GenerationError::Authentication {
                    endpoint: url,
                    detail,
                },
                403 => GenerationError::PermissionDenied {
                    endpoint: url,
                    detail,
                },
                404 => GenerationError::EndpointNotFound {
                    endpoint: url,
                    detail,
                },
                code => GenerationError::Api {
                    status: code,
                    endpoint: url,
                    detail,
                },
            });
        }

        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::MalformedResponse {
                    endpoint: url.clone(),
                    detail: e.to_string(),
                })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::MalformedResponse {
                endpoint: url,
                detail: "no choices in response".to_string(),
            })?;

        info!("generation returned {} characters", text.len());
        Ok(text)
    }
}

/// Truncate an error body for inclusion in messages.
fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Wire format of the chat-completions response.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}
