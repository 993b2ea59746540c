// Tenancy Assistant: Ontario tenancy law Q&A and rental contract analysis on hosted LLMs

pub mod assistant;
pub mod chat;
pub mod config;
pub mod documents;
pub mod history;
pub mod law;
pub mod models;
pub mod prompt;

// Re-export main components for external use
pub use assistant::LegalAssistant;
pub use chat::{ChatOutcome, ChatSession};
pub use crate::config::{ProviderSettings, Settings};
pub use documents::{read_contract, read_contract_from, DocumentError, DocumentType};
pub use history::{ChatHistory, ChatRole, ChatTurn};
pub use law::LawText;
pub use models::{
    create_chat_model, AnthropicChatModel, ChatCompletion, ChatMessage, ChatModel,
    GeminiChatModel, OpenAIChatModel, Provider, TokenUsage,
};
pub use prompt::{
    format_contract_analysis_prompt, format_conversational_prompt, PromptError, PromptTemplate,
};

// Export anyhow so callers share the same error type
pub use anyhow;
