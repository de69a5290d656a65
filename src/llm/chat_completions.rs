//! `OpenAI` Chat Completions client.

use anyhow::{Context, anyhow};

use super::{ChatMessage, ChatModel, LlmSettings, Provider};

/// Client for `/v1/chat/completions` (or the Azure deployment equivalent).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsClient {
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
        })
    }
}

/// Pull the assistant text out of a Chat Completions response body.
fn extract_content(body: &serde_json::Value) -> anyhow::Result<String> {
    let choice = body["choices"]
        .get(0)
        .ok_or_else(|| anyhow!("response contained no choices"))?;
    choice["message"]["content"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("response message had no text content"))
}

#[async_trait::async_trait]
impl ChatModel for ChatCompletionsClient {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let url = self.settings.provider.build_chat_url(&self.settings.base_url);

        let mut rb = self.http.post(&url).json(&self.request_body(messages));
        if let Some(k) = &self.settings.api_key {
            rb = match self.settings.provider {
                Provider::AzureOpenAI { .. } => rb.header("api-key", k),
                Provider::OpenAI | Provider::Generic => rb.bearer_auth(k),
            };
        }

        tracing::debug!(
            name: "llm.request",
            model = %self.settings.model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let resp = rb
            .send()
            .await
            .context("chat completion request failed")?
            .error_for_status()?;
        let body: serde_json::Value = resp.json().await?;
        let content = extract_content(&body)?;

        tracing::debug!(
            name: "llm.response",
            content_length = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_first_choice() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello there"}}]
        });
        assert_eq!(extract_content(&body).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_no_choices_errors() {
        assert!(extract_content(&json!({"choices": []})).is_err());
        assert!(extract_content(&json!({})).is_err());
    }

    #[test]
    fn test_extract_null_content_errors() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "no"}}]
        });
        let err = extract_content(&body).unwrap_err();
        assert!(err.to_string().contains("no text content"));
    }

    #[test]
    fn test_request_body_shape() {
        let client = ChatCompletionsClient::new(LlmSettings {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            provider: Provider::OpenAI,
        });
        let body = client.request_body(&[ChatMessage::system("be Roger"), ChatMessage::user("hi")]);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }
}
