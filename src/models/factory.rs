// Factory for creating chat model instances from settings
use anyhow::Error;
use log::info;

use super::anthropic::AnthropicChatModel;
use super::chat::ChatModel;
use super::gemini::GeminiChatModel;
use super::openai::OpenAIChatModel;
use super::provider::Provider;
use crate::config::Settings;

/// Build the chat model for `provider`, resolving key, model and sampling
/// parameters from `settings` with the provider's defaults as fallback.
pub fn create_chat_model(
    provider: Provider,
    settings: &Settings,
) -> Result<Box<dyn ChatModel>, Error> {
    let api_key = settings.api_key(provider)?;
    let overrides = settings.provider_settings(provider);

    let model_name = overrides
        .model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());
    let temperature = overrides.temperature.or(provider.default_temperature());
    let max_tokens = overrides.max_tokens.or(provider.default_max_tokens());
    let base_url = overrides.base_url.clone();
    let system_prompt = settings.system_prompt();

    info!("Using {} model {}", provider, model_name);

    let model: Box<dyn ChatModel> = match provider {
        Provider::OpenAI | Provider::Groq => Box::new(
            OpenAIChatModel::for_provider(provider, api_key, base_url)
                .with_model(model_name)
                .with_temperature(temperature)
                .with_max_tokens(max_tokens)
                .with_system_prompt(system_prompt),
        ),
        Provider::Anthropic => Box::new(
            AnthropicChatModel::new(api_key, base_url)
                .with_model(model_name)
                .with_temperature(temperature)
                .with_max_tokens(max_tokens)
                .with_system_prompt(system_prompt),
        ),
        Provider::Gemini => Box::new(
            GeminiChatModel::new(api_key, base_url)
                .with_model(model_name)
                .with_temperature(temperature)
                .with_max_tokens(max_tokens)
                .with_system_prompt(system_prompt),
        ),
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SYSTEM_PROMPT;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    fn settings_with_key(provider: Provider, base_url: Option<String>) -> Settings {
        let mut settings = Settings::default();
        let overrides = settings.providers.get_mut(provider);
        overrides.api_key = Some("test-key".to_string());
        overrides.base_url = base_url;
        settings
    }

    #[test]
    fn test_creates_each_provider_with_defaults() {
        for provider in Provider::ALL {
            let model = create_chat_model(provider, &settings_with_key(provider, None)).unwrap();
            assert_eq!(model.provider(), provider);
            assert_eq!(model.model_name(), provider.default_model());
            assert_eq!(model.system_prompt(), Some(DEFAULT_SYSTEM_PROMPT));
        }
    }

    #[test]
    #[serial]
    fn test_missing_api_key_is_rejected() {
        std::env::remove_var("GEMINI_API_KEY");
        let err = create_chat_model(Provider::Gemini, &Settings::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_overrides_reach_the_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Json(json!({
                "model": "llama-3.3-70b-versatile",
                "temperature": 0.0,
                "max_tokens": 2000,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#)
            .create_async()
            .await;

        let mut settings = settings_with_key(Provider::Groq, Some(server.url()));
        settings.providers.groq.model = Some("llama-3.3-70b-versatile".to_string());
        settings.providers.groq.temperature = Some(0.0);
        settings.system_prompt = String::new();

        let model = create_chat_model(Provider::Groq, &settings).unwrap();
        assert_eq!(model.complete("hello").await.unwrap(), "hi");
        mock.assert_async().await;
    }
}
