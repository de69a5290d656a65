//! Model client abstraction.
//!
//! The Twin API only needs one capability from a language model: given a
//! conversation, return the assistant's next reply. [`ChatModel`] captures
//! that, and [`ChatCompletionsClient`] implements it for any
//! `OpenAI`-compatible Chat Completions endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use ch3rry_pi3::llm::{ChatCompletionsClient, LlmSettings, Provider};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.openai.com".to_string(),
//!     api_key: Some("sk-...".to_string()),
//!     model: "gpt-4o-mini".to_string(),
//!     provider: Provider::OpenAI,
//! };
//! let client = ChatCompletionsClient::new(settings);
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-4o-mini`).
    pub model: String,
    /// Provider type, detected from `base_url` unless configured.
    pub provider: Provider,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("provider", &self.provider)
            .finish()
    }
}

impl From<&LlmConfig> for LlmSettings {
    fn from(cfg: &LlmConfig) -> Self {
        let provider = match Provider::detect_from_url(&cfg.base_url) {
            Provider::AzureOpenAI {
                deployment_name,
                api_version,
            } => Provider::AzureOpenAI {
                deployment_name: cfg.azure_deployment.clone().unwrap_or(deployment_name),
                api_version: cfg.azure_api_version.clone().unwrap_or(api_version),
            },
            other => other,
        };

        Self {
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: cfg.model.clone(),
            provider,
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A model that produces the next assistant reply for a conversation.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete the conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no content.
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String>;
}
