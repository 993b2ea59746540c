// Google Gemini generateContent client
use super::chat::{check_status, ChatCompletion, ChatModel};
use super::message::{ChatMessage, TokenUsage};
use super::provider::Provider;
use anyhow::Error;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

#[derive(Clone)]
pub struct GeminiChatModel {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
}

impl GeminiChatModel {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let provider = Provider::Gemini;
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

    fn request_body(&self, messages: Vec<ChatMessage>) -> serde_json::Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        for message in messages {
            match message {
                ChatMessage::System(text) => system_parts.push(serde_json::json!({ "text": text })),
                ChatMessage::Human(text) => contents.push(serde_json::json!({
                    "role": "user",
                    "parts": [{ "text": text }],
                })),
                ChatMessage::AIMessage(text) => contents.push(serde_json::json!({
                    "role": "model",
                    "parts": [{ "text": text }],
                })),
            }
        }

        let mut request_body = serde_json::json!({ "contents": contents });
        if !system_parts.is_empty() {
            request_body["systemInstruction"] = serde_json::json!({ "parts": system_parts });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = self.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max) = self.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max));
        }
        if !generation_config.is_empty() {
            request_body["generationConfig"] = serde_json::Value::Object(generation_config);
        }
        request_body
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion, Error> {
        let request_body = self.request_body(messages);
        let api_url = format!("{}/models/{}:generateContent", self.base_url, self.model_name);
        info!("Sending request to Gemini model {}", self.model_name);

        let response = self
            .client
            .post(&api_url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(Provider::Gemini, response).await?;
        let response: GenerateContentResponse = response.json().await?;

        let content: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if content.is_empty() {
            return Err(Error::msg("No content returned from Gemini API"));
        }

        let usage = response.usage_metadata.map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        });

        Ok(ChatCompletion {
            content,
            usage,
            model_name: response.model_version.unwrap_or_else(|| self.model_name.clone()),
        })
    }
}
