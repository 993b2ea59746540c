// Supported LLM providers and their built-in defaults
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hosted inference service backing the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Groq,
    Anthropic,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Groq,
        Provider::Anthropic,
        Provider::Gemini,
    ];

    /// Lowercase identifier used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Groq => "groq",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }

    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-3.5-turbo",
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::Anthropic => "claude-3-opus-20240229",
            Provider::Gemini => "gemini-pro",
        }
    }

    pub fn default_temperature(&self) -> Option<f64> {
        match self {
            Provider::OpenAI => Some(0.3),
            Provider::Groq => Some(0.2),
            Provider::Anthropic | Provider::Gemini => None,
        }
    }

    pub fn default_max_tokens(&self) -> Option<u32> {
        match self {
            Provider::OpenAI => Some(1000),
            Provider::Groq | Provider::Anthropic => Some(2000),
            Provider::Gemini => None,
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Groq
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAI => "OpenAI",
            Provider::Groq => "Groq",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                anyhow::Error::msg(format!(
                    "Unsupported LLM provider: {} (expected one of openai, groq, anthropic, gemini)",
                    s
                ))
            })
    }
}

// Same case-insensitive names as the command line
impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
