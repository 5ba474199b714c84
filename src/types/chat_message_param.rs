use serde::{Deserialize, Serialize};

/// Role of a message sent to the chat-completion endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instruction.
    System,

    /// User message.
    User,

    /// Assistant message.
    Assistant,
}

/// A role-tagged message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessageParam {
    /// The role of the message.
    pub role: ChatRole,

    /// The text of the message.
    pub content: String,
}

impl ChatMessageParam {
    /// Create a new `ChatMessageParam`.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}
