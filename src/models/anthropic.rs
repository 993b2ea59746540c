// Anthropic Messages API client
use super::chat::{check_status, ChatCompletion, ChatModel};
use super::message::{ChatMessage, TokenUsage};
use super::provider::Provider;
use anyhow::Error;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

const ANTHROPIC_VERSION: &str = "2023-06-01";
// The Messages API requires max_tokens on every request
const FALLBACK_MAX_TOKENS: u32 = 2000;

#[derive(Deserialize)]
struct AnthropicResponse {
    model: Option<String>,
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

#[derive(Clone)]
pub struct AnthropicChatModel {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
}

impl AnthropicChatModel {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let provider = Provider::Anthropic;
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| provider.default_base_url().to_string())
                .trim_end_matches('/')
                .to_string(),
            model_name: provider.default_model().to_string(),
            temperature: provider.default_temperature(),
            max_tokens: provider.default_max_tokens(),
            system_prompt: None,
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// System messages move to the top-level `system` field.
    fn request_body(&self, messages: Vec<ChatMessage>) -> serde_json::Value {
        let mut system_parts = Vec::new();
        let mut turns = Vec::new();
        for message in messages {
            match message {
                ChatMessage::System(content) => system_parts.push(content),
                other => turns.push(serde_json::json!({
                    "role": other.role(),
                    "content": other.content(),
                })),
            }
        }

        let mut request_body = serde_json::json!({
            "model": self.model_name,
            "max_tokens": self.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            "messages": turns,
        });
        if !system_parts.is_empty() {
            request_body["system"] = serde_json::json!(system_parts.join("\n\n"));
        }
        if let Some(temp) = self.temperature {
            request_body["temperature"] = serde_json::json!(temp);
        }
        request_body
    }
}

#[async_trait]
impl ChatModel for AnthropicChatModel {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion, Error> {
        let request_body = self.request_body(messages);
        let api_url = format!("{}/messages", self.base_url);
        info!("Sending request to Anthropic model {}", self.model_name);

        let response = self
            .client
            .post(&api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(Provider::Anthropic, response).await?;
        let response: AnthropicResponse = response.json().await?;

        let content: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if content.is_empty() {
            return Err(Error::msg("No content returned from Anthropic API"));
        }

        let usage = response.usage.map(|usage| TokenUsage {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.input_tokens + usage.output_tokens,
        });

        Ok(ChatCompletion {
            content,
            usage,
            model_name: response.model.unwrap_or_else(|| self.model_name.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_uses_messages_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "anthropic-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::Json(json!({
                "model": "claude-3-opus-20240229",
                "max_tokens": 2000,
                "system": "Be precise.",
                "messages": [{"role": "user", "content": "Is a pet deposit legal?"}]
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "id": "msg_1",
                    "type": "message",
                    "role": "assistant",
                    "model": "claude-3-opus-20240229",
                    "content": [
                        {"type": "text", "text": "No. Pet deposits "},
                        {"type": "text", "text": "are prohibited."}
                    ],
                    "usage": {"input_tokens": 20, "output_tokens": 6}
                }"#,
            )
            .create_async()
            .await;

        let model = AnthropicChatModel::new("anthropic-key".to_string(), Some(server.url()))
            .with_system_prompt(Some("Be precise.".to_string()));
        let completion = model
            .invoke(vec![
                ChatMessage::system("Be precise."),
                ChatMessage::human("Is a pet deposit legal?"),
            ])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "No. Pet deposits are prohibited.");
        assert_eq!(completion.usage.unwrap().total_tokens, 26);
    }

    #[tokio::test]
    async fn test_temperature_and_max_tokens_overrides() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-5-sonnet-latest",
                "max_tokens": 512,
                "temperature": 0.5
            })))
            .with_status(200)
            .with_body(r#"{"content": [{"type": "text", "text": "ok"}]}"#)
            .create_async()
            .await;

        let model = AnthropicChatModel::new("k".to_string(), Some(server.url()))
            .with_model("claude-3-5-sonnet-latest")
            .with_max_tokens(Some(512))
            .with_temperature(Some(0.5));
        assert_eq!(model.complete("hi").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_max_tokens_falls_back() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_body(Matcher::PartialJson(json!({"max_tokens": 2000})))
            .with_status(200)
            .with_body(r#"{"content": [{"type": "text", "text": "ok"}]}"#)
            .create_async()
            .await;

        let model =
            AnthropicChatModel::new("k".to_string(), Some(server.url())).with_max_tokens(None);
        model.complete("hi").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(529)
            .with_body(r#"{"type": "error", "error": {"type": "overloaded_error"}}"#)
            .create_async()
            .await;

        let model = AnthropicChatModel::new("k".to_string(), Some(server.url()));
        let err = model.complete("hi").await.unwrap_err().to_string();
        assert!(err.contains("Anthropic API request failed"));
        assert!(err.contains("529"));
        assert!(err.contains("overloaded_error"));
    }

    #[tokio::test]
    async fn test_no_text_blocks_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(r#"{"content": [{"type": "tool_use", "id": "t1"}]}"#)
            .create_async()
            .await;

        let model = AnthropicChatModel::new("k".to_string(), Some(server.url()));
        let err = model.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("No content returned from Anthropic API"));
    }
}
