// Public modules
pub mod accumulator;
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;

// Re-exports
pub use client::{ApiKey, FragmentStream, HuggingFace, InferenceClient};
pub use error::{Error, FailureKind, Result};
pub use observability::register_biometrics;
pub use types::*;
