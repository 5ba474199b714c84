//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the configuration structure the
//! chat session is constructed with.  The credential is read from the environment once, here,
//! and travels inside [`ChatConfig`]; nothing else in the crate reads the environment.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::ApiKey;
use crate::types::Model;

/// Environment variable holding the access token.
pub const API_KEY_ENV: &str = "HF_API_KEY";

/// Maximum tokens generated per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 250;

/// Sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The fixed instruction sent ahead of every user message.
pub const SYSTEM_PROMPT: &str = "You are a helpful language translation assistant. \
    You provide expert translation skills, both proper and informal when asked, and understand \
    commonly used slang. Stay 100% focused on translation at all times. \
    Understand what language the user is speaking to you.";

/// Template offered by `/template`.
pub const DEFAULT_TEMPLATE: &str = "Translate [text] to French";

/// Banner shown until the first message.
pub const WELCOME_TEXT: &str = "Welcome! Type something to translate, \
    or /template to start from a template. /help lists commands.";

/// Command-line arguments for the parley-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat-completion endpoint.
    #[arrrg(optional, "Endpoint base URL (default: https://router.huggingface.co/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Template text for `/template`.
    #[arrrg(optional, "Template used by /template", "TEXT")]
    pub template: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// The model, token budget, temperature, and system prompt are static: the session exposes no
/// way to change them.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The access token, if one is configured.
    pub api_key: Option<ApiKey>,

    /// The model to use for generating responses.
    pub model: Model,

    /// System instruction sent with every request.
    pub system_prompt: String,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Base URL override for the endpoint.
    pub base_url: Option<String>,

    /// Request timeout override.
    pub timeout: Option<Duration>,

    /// Text applied by the "use template" affordance.
    pub template: String,

    /// Text of the welcome entry.
    pub welcome: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values and no credential.
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: Model::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
            timeout: None,
            template: DEFAULT_TEMPLATE.to_string(),
            welcome: WELCOME_TEXT.to_string(),
            use_color: true,
        }
    }

    /// Builds the configuration from parsed arguments and the process environment.
    pub fn from_env(args: ChatArgs) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().and_then(ApiKey::new);
        Self::from(args).with_api_key(api_key)
    }

    /// Sets the credential.
    pub fn with_api_key(mut self, api_key: Option<ApiKey>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the endpoint base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the template text.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            base_url: args.base_url,
            timeout: args.timeout.map(Duration::from_secs),
            template: args.template.unwrap_or(defaults.template.clone()),
            use_color: !args.no_color,
            ..defaults
        }
    }
}
