use serde::{Deserialize, Serialize};

use crate::types::{ChatMessageParam, Model};

/// Body of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model that will complete the conversation.
    pub model: Model,

    /// Role-tagged input messages.
    pub messages: Vec<ChatMessageParam>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Whether the response is delivered as server-sent events.
    #[serde(default)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    fn new(model: Model, messages: Vec<ChatMessageParam>, max_tokens: u32) -> Self {
        Self {
            model,
            messages,
            max_tokens,
            temperature: None,
            stream: false,
        }
    }

    /// Builds the two-message request used by the chat session: the system instruction followed
    /// by the latest user message.
    pub fn translation(
        model: Model,
        system_prompt: &str,
        user_message: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self::new(
            model,
            vec![
                ChatMessageParam::system(system_prompt),
                ChatMessageParam::user(user_message),
            ],
            max_tokens,
        )
        .with_temperature(temperature)
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Requests a streamed response.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}
