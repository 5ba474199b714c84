//! Error types for parley.
//!
//! Every failure the chat session can observe is an [`Error`].  Transport failures are classified
//! once, where the HTTP client sees them, so the rest of the crate only deals with typed errors.
//! [`Error::kind`] collapses the variants into the four outcomes a user can act on, and
//! [`Error::user_message`] renders the text that lands in the transcript.

use std::error;
use std::fmt;
use std::str::Utf8Error;
use std::sync::Arc;

/// Shown when no credential is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "API key not found! Make sure HF_API_KEY is set.";

/// Shown when the service rejects the credential.
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API key. Please check your HF_API_KEY setting.";

/// Shown when the hosted model is still warming up.
pub const MODEL_LOADING_MESSAGE: &str = "Model is loading. Please wait a moment.";

/// The main error type for parley.
#[derive(Clone, Debug)]
pub enum Error {
    /// Required configuration is missing or unusable.
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// The service rejected the credential.
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// The service or the model behind it is not ready.
    ServiceUnavailable {
        /// Human-readable error message.
        message: String,
        /// Time to wait before trying again, in seconds.
        retry_after: Option<u64>,
    },

    /// The API returned an error status that has no dedicated variant.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error type string from the API.
        error_type: Option<String>,
        /// Human-readable error message.
        message: String,
    },

    /// The request timed out.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// Connection error.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// A streaming error occurred.
    Streaming {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Encoding/decoding error.
    Encoding {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },
}

/// The user-actionable classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The credential is missing; nothing was sent.
    Configuration,
    /// The service rejected the credential.
    Authentication,
    /// The model is loading or the service is temporarily down.
    ServiceUnavailable,
    /// Any other failure.
    Transport,
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates the configuration error for a missing credential.
    pub fn missing_api_key() -> Self {
        Error::configuration(MISSING_API_KEY_MESSAGE)
    }

    /// Creates a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::ServiceUnavailable {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new API error.
    pub fn api(status_code: u16, error_type: Option<String>, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            error_type,
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new streaming error.
    pub fn streaming(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Streaming {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new encoding error.
    pub fn encoding(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Encoding {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Classifies a failure reported by the service.
    ///
    /// The hosted endpoint reports some conditions only as free text, in the body of an error
    /// status or inside the event stream.  The status decides first; the text decides when the
    /// status is ambiguous or absent.
    pub fn from_service(
        status_code: Option<u16>,
        error_type: Option<String>,
        message: String,
    ) -> Self {
        match status_code {
            Some(401) | Some(403) => return Error::authentication(message),
            Some(503) => return Error::service_unavailable(message, None),
            _ => {}
        }
        if mentions_credentials(&message) {
            Error::authentication(message)
        } else if message.to_lowercase().contains("loading") {
            Error::service_unavailable(message, None)
        } else {
            Error::api(status_code.unwrap_or(500), error_type, message)
        }
    }

    /// Returns the user-actionable classification of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Configuration { .. } => FailureKind::Configuration,
            Error::Authentication { .. } => FailureKind::Authentication,
            Error::ServiceUnavailable { .. } => FailureKind::ServiceUnavailable,
            _ => FailureKind::Transport,
        }
    }

    /// Returns the text shown in the transcript for this error.
    pub fn user_message(&self) -> String {
        match self {
            Error::Configuration { message } => message.clone(),
            Error::Authentication { .. } => INVALID_API_KEY_MESSAGE.to_string(),
            Error::ServiceUnavailable { .. } => MODEL_LOADING_MESSAGE.to_string(),
            _ => {
                if self.message().trim().is_empty() {
                    "Failed to get AI response: unknown error".to_string()
                } else {
                    format!("Failed to get AI response: {self}")
                }
            }
        }
    }

    /// Returns the bare message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Error::Configuration { message }
            | Error::Authentication { message }
            | Error::ServiceUnavailable { message, .. }
            | Error::Api { message, .. }
            | Error::Timeout { message, .. }
            | Error::Connection { message, .. }
            | Error::Serialization { message, .. }
            | Error::HttpClient { message, .. }
            | Error::Url { message, .. }
            | Error::Streaming { message, .. }
            | Error::Encoding { message, .. } => message,
        }
    }

    /// Returns true if this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns true if this error is related to authentication.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns true if the service reported itself unavailable.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Error::ServiceUnavailable { .. })
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns true if this error came from the event stream.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Error::Streaming { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

fn mentions_credentials(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["api key", "api_key", "credentials", "unauthorized", "authorization"]
        .iter()
        .any(|needle| lower.contains(needle))
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "Configuration error: {message}")
            }
            Error::Authentication { message } => {
                write!(f, "Authentication error: {message}")
            }
            Error::ServiceUnavailable {
                message,
                retry_after,
            } => {
                if let Some(retry_after) = retry_after {
                    write!(
                        f,
                        "Service unavailable: {message} (retry after {retry_after} seconds)"
                    )
                } else {
                    write!(f, "Service unavailable: {message}")
                }
            }
            Error::Api {
                status_code,
                error_type,
                message,
            } => {
                if let Some(error_type) = error_type {
                    write!(f, "{error_type} ({status_code}): {message}")
                } else {
                    write!(f, "API error ({status_code}): {message}")
                }
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::Streaming { message, .. } => {
                write!(f, "Streaming error: {message}")
            }
            Error::Encoding { message, .. } => {
                write!(f, "Encoding error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::Streaming { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Encoding { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::encoding(format!("UTF-8 error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for parley operations.
pub type Result<T> = std::result::Result<T, Error>;
