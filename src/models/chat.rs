// Chat model interface and related structure definitions
use anyhow::Error;
use async_trait::async_trait;
use reqwest::Response;

use crate::models::message::{ChatMessage, TokenUsage};
use crate::models::provider::Provider;

// Simplified chat completion structure
#[derive(Clone, Debug)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub model_name: String,
}

/// Chat model interface, one implementation per provider.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn provider(&self) -> Provider;

    fn model_name(&self) -> &str;

    /// System prompt prepended by [`ChatModel::complete`]
    fn system_prompt(&self) -> Option<&str> {
        None
    }

    // Core method: handle chat messages
    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion, Error>;

    /// Send a single prompt and return the completion text.
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::human(prompt));

        let completion = self.invoke(messages).await?;
        if let Some(usage) = &completion.usage {
            log::debug!(
                "{} ({}) used {} prompt + {} completion tokens",
                self.provider(),
                completion.model_name,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(completion.content)
    }
}

/// Turn a non-2xx response into an error carrying status and body.
pub(crate) async fn check_status(
    provider: Provider,
    response: Response,
) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    log::error!("{} API request failed with status {}", provider, status);
    Err(Error::msg(format!(
        "{} API request failed: {} - {}",
        provider, status, error_text
    )))
}
