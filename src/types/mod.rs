// Public modules
pub mod chat_completion_chunk;
pub mod chat_completion_request;
pub mod chat_message_param;
pub mod model;

// Re-exports
pub use chat_completion_chunk::{
    ChatCompletionChunk, ChunkChoice, ChunkDelta, StreamErrorDetail, StreamErrorPayload,
};
pub use chat_completion_request::ChatCompletionRequest;
pub use chat_message_param::{ChatMessageParam, ChatRole};
pub use model::{KnownModel, Model};
