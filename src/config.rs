// Application configuration: defaults, optional TOML file, then environment
use anyhow::{Context, Error};
use config::{Config, Environment, File};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::Provider;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tenancy-assistant.toml";

/// Prefix for environment overrides, e.g. `TENANCY_PROVIDER=openai`
pub const ENV_PREFIX: &str = "TENANCY";

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a legal assistant specializing in Ontario Tenancy Law.";

/// Per-provider overrides. Unset fields fall back to the provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderSettings {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub openai: ProviderSettings,
    pub groq: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub gemini: ProviderSettings,
}

impl ProvidersSettings {
    pub fn get(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::OpenAI => &self.openai,
            Provider::Groq => &self.groq,
            Provider::Anthropic => &self.anthropic,
            Provider::Gemini => &self.gemini,
        }
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderSettings {
        match provider {
            Provider::OpenAI => &mut self.openai,
            Provider::Groq => &mut self.groq,
            Provider::Anthropic => &mut self.anthropic,
            Provider::Gemini => &mut self.gemini,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: Provider,
    /// Empty string disables the system prompt
    pub system_prompt: String,
    pub law_text_path: Option<PathBuf>,
    pub providers: ProvidersSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            law_text_path: None,
            providers: ProvidersSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `config_path` must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read if present.
    pub fn load(config_path: Option<&Path>) -> Result<Self, Error> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!("Loaded settings for provider {}", settings.provider);
        Ok(settings)
    }

    pub fn provider_settings(&self, provider: Provider) -> &ProviderSettings {
        self.providers.get(provider)
    }

    pub fn system_prompt(&self) -> Option<String> {
        let prompt = self.system_prompt.trim();
        if prompt.is_empty() {
            None
        } else {
            Some(prompt.to_string())
        }
    }

    /// API key from the settings, else from the provider's environment variable
    pub fn api_key(&self, provider: Provider) -> Result<String, Error> {
        let configured = self
            .provider_settings(provider)
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty());
        if let Some(key) = configured {
            return Ok(key);
        }

        let env_name = provider.api_key_env();
        match std::env::var(env_name) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::msg(format!(
                "{} API key not found. Please set {} environment variable",
                provider.as_str().to_uppercase(),
                env_name
            ))),
        }
    }
}
