// Message type definitions
use serde::{Deserialize, Serialize};

// Simplified message type system
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatMessage {
    System(String),
    Human(String),
    AIMessage(String),
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System(content.into())
    }

    pub fn human(content: impl Into<String>) -> Self {
        ChatMessage::Human(content.into())
    }

    pub fn ai(content: impl Into<String>) -> Self {
        ChatMessage::AIMessage(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System(content)
            | ChatMessage::Human(content)
            | ChatMessage::AIMessage(content) => content,
        }
    }

    /// Role name in the OpenAI/Anthropic wire format
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System(_) => "system",
            ChatMessage::Human(_) => "user",
            ChatMessage::AIMessage(_) => "assistant",
        }
    }
}

// Token usage statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}
