use std::fmt;

use serde::{Deserialize, Serialize};

/// A hosted chat-completion model identifier.
///
/// This can be a model the crate knows about or a custom string for any other model served by
/// the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model identifiers.
    Known(KnownModel),

    /// Custom model identifier.
    Custom(String),
}

/// Known hosted instruction-tuned models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Qwen 2.5, 72B parameters, instruction tuned.
    #[serde(rename = "Qwen/Qwen2.5-72B-Instruct")]
    Qwen25_72BInstruct,
}

impl KnownModel {
    /// Returns the identifier the endpoint expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Qwen25_72BInstruct => "Qwen/Qwen2.5-72B-Instruct",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Qwen25_72BInstruct)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{known_model}"),
            Model::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
