// Model module definition
mod anthropic;
mod chat;
mod factory;
mod gemini;
mod message;
mod openai;
mod provider;

// Re-export module content
pub use anthropic::AnthropicChatModel;
pub use chat::{ChatCompletion, ChatModel};
pub use factory::create_chat_model;
pub use gemini::GeminiChatModel;
pub use message::{ChatMessage, TokenUsage};
pub use openai::OpenAIChatModel;
pub use provider::Provider;
