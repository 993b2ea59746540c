// OpenAI-compatible chat completions client, shared by OpenAI and Groq
use super::chat::{check_status, ChatCompletion, ChatModel};
use super::message::{ChatMessage, TokenUsage};
use super::provider::Provider;
use anyhow::Error;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

// Chat Completions usage statistics
#[derive(Deserialize, Default)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
    #[serde(default)]
    total_tokens: usize,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

// OpenAI model implementation, also used for OpenAI-compatible hosts
#[derive(Clone)]
pub struct OpenAIChatModel {
    client: Client,
    provider: Provider,
    api_key: String,
    base_url: String,
    model_name: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
}

impl OpenAIChatModel {
    /// Create a new OpenAI chat model instance
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self::for_provider(Provider::OpenAI, api_key, base_url)
    }

    /// Create a client for an OpenAI-compatible provider (OpenAI or Groq)
    pub fn for_provider(provider: Provider, api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            provider,
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Set model name
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set temperature parameter
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set maximum number of tokens
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    fn request_body(&self, messages: Vec<ChatMessage>) -> serde_json::Value {
        let messages: Vec<OpenAIMessage> = messages
            .into_iter()
            .map(|msg| OpenAIMessage {
                role: msg.role().to_string(),
                content: Some(msg.content().to_string()),
            })
            .collect();

        let mut request_body = serde_json::json!({
            "model": self.model_name,
            "messages": messages,
        });
        if let Some(temp) = self.temperature {
            request_body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = self.max_tokens {
            request_body["max_tokens"] = serde_json::json!(max);
        }
        request_body
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion, Error> {
        let request_body = self.request_body(messages);
        let api_url = format!("{}/chat/completions", self.base_url);
        info!("Sending request to {} model {}", self.provider, self.model_name);

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(self.provider, response).await?;
        let response: OpenAIResponse = response.json().await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::msg(format!("No content returned from {} API", self.provider)))?;

        let usage = response.usage.map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
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

    const COMPLETION_BODY: &str = r#"{
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo-0125",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "Rent can rise once every 12 months."}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 42, "completion_tokens": 9, "total_tokens": 51}
    }"#;

    #[test]
    fn test_provider_defaults() {
        let model = OpenAIChatModel::new("key".to_string(), None);
        assert_eq!(model.base_url(), "https://api.openai.com/v1");
        assert_eq!(model.model_name(), "gpt-3.5-turbo");
        assert_eq!(model.temperature(), Some(0.3));
        assert_eq!(model.max_tokens(), Some(1000));

        let groq = OpenAIChatModel::for_provider(Provider::Groq, "key".to_string(), None);
        assert_eq!(groq.provider(), Provider::Groq);
        assert_eq!(groq.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(groq.model_name(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let base_url = Some("http://localhost:1234/v1/".to_string());
        let model = OpenAIChatModel::new("key".to_string(), base_url);
        assert_eq!(model.base_url(), "http://localhost:1234/v1");
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.3,
                "max_tokens": 1000,
                "messages": [
                    {"role": "system", "content": "You are a legal assistant specializing in Ontario Tenancy Law."},
                    {"role": "user", "content": "How often can rent increase?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(COMPLETION_BODY)
            .create_async()
            .await;

        let model = OpenAIChatModel::new("test-key".to_string(), Some(server.url()))
            .with_system_prompt(Some(
                "You are a legal assistant specializing in Ontario Tenancy Law.".to_string(),
            ));
        let answer = model.complete("How often can rent increase?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "Rent can rise once every 12 months.");
    }

    #[tokio::test]
    async fn test_invoke_reports_usage_and_model() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(COMPLETION_BODY)
            .create_async()
            .await;

        let model =
            OpenAIChatModel::for_provider(Provider::Groq, "k".to_string(), Some(server.url()));
        let completion = model.invoke(vec![ChatMessage::human("hi")]).await.unwrap();

        assert_eq!(completion.model_name, "gpt-3.5-turbo-0125");
        assert_eq!(
            completion.usage,
            Some(TokenUsage {
                prompt_tokens: 42,
                completion_tokens: 9,
                total_tokens: 51
            })
        );
    }

    #[tokio::test]
    async fn test_optional_parameters_are_omitted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Json(json!({
                "model": "local-model",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .with_status(200)
            .with_body(COMPLETION_BODY)
            .create_async()
            .await;

        let model = OpenAIChatModel::new("k".to_string(), Some(server.url()))
            .with_model("local-model")
            .with_temperature(None)
            .with_max_tokens(None);
        model.complete("hi").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Invalid API key"}}"#)
            .create_async()
            .await;

        let model =
            OpenAIChatModel::for_provider(Provider::Groq, "bad".to_string(), Some(server.url()));
        let err = model.complete("hi").await.unwrap_err().to_string();

        assert!(err.contains("Groq API request failed"));
        assert!(err.contains("401"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let model = OpenAIChatModel::new("k".to_string(), Some(server.url()));
        let err = model.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("No content returned from OpenAI API"));
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": ""}}]}"#)
            .create_async()
            .await;

        let model =
            OpenAIChatModel::for_provider(Provider::Groq, "k".to_string(), Some(server.url()));
        let err = model.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("No content returned from Groq API"));
    }
}
