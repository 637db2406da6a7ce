//! Generation request types.

use serde::{Deserialize, Serialize};

/// Hard cap on output length imposed by the provider.
pub const MAX_OUTPUT_TOKENS: u32 = 32_768;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Persona and behavioral instructions.
    System,
    /// Caller-supplied content.
    User,
    /// Model output (unused when building requests, present for parsing).
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: MessageRole,

    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Sampling configuration for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum output length; clamped to [`MAX_OUTPUT_TOKENS`] when sent.
    pub max_output_tokens: u32,

    /// Nucleus-sampling threshold.
    pub top_p: f32,

    /// Frequency penalty (-2.0 to 2.0).
    pub frequency_penalty: f32,

    /// Presence penalty (-2.0 to 2.0).
    pub presence_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// One fully assembled generation request.
///
/// Constructed fresh per call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Ordered messages (system instruction first, then the user prompt).
    pub messages: Vec<ChatMessage>,

    /// Sampling configuration.
    pub params: SamplingParams,
}

impl GenerationRequest {
    /// Build a request from a system persona and a user prompt.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            params: SamplingParams::default(),
        }
    }

    /// Replace the sampling configuration.
    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// The user-role message content, if present.
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}
