use serde::{Deserialize, Serialize};

/// One streamed chunk of a chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionChunk {
    /// Identifier shared by every chunk of one completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Model that produced the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Incremental choices; the chat session only reads the first.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A single choice inside a [`ChatCompletionChunk`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    /// Position of the choice.
    #[serde(default)]
    pub index: u32,

    /// Text added by this chunk.
    #[serde(default)]
    pub delta: ChunkDelta,

    /// Why generation stopped, on the final chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The incremental message content of a [`ChunkChoice`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkDelta {
    /// Role, present on the first chunk only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Returns the generated text carried by the first choice, if it is non-empty.
    pub fn fragment(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

/// An error reported inside the event stream instead of a chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamErrorPayload {
    /// The error, as text or as an object with a message.
    pub error: StreamErrorDetail,

    /// Error category, when the server supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// The body of a [`StreamErrorPayload`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StreamErrorDetail {
    /// Plain message.
    Text(String),

    /// Structured error.
    Object {
        /// Human-readable message.
        #[serde(default)]
        message: String,
        /// Error category.
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        error_type: Option<String>,
    },
}

impl StreamErrorPayload {
    /// Returns the error message.
    pub fn message(&self) -> &str {
        match &self.error {
            StreamErrorDetail::Text(message) => message,
            StreamErrorDetail::Object { message, .. } => message,
        }
    }

    /// Returns the error category from either location.
    pub fn error_type(&self) -> Option<&str> {
        match &self.error {
            StreamErrorDetail::Object {
                error_type: Some(error_type),
                ..
            } => Some(error_type),
            _ => self.error_type.as_deref(),
        }
    }
}
