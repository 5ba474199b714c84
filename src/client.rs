use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use futures::future;
use futures::stream::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, STREAM_BYTES,
    STREAM_DURATION, STREAM_ERRORS, STREAM_FRAGMENTS, STREAM_TTFB,
};
use crate::sse::{StreamEvent, process_sse};
use crate::types::ChatCompletionRequest;

/// The endpoint used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://router.huggingface.co/v1/";
/// The request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A lazy, single-pass stream of generated text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A stream of decoded server-sent events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// An access token for the inference endpoint.
///
/// Blank tokens are rejected at construction so that holding an `ApiKey` means a credential is
/// configured.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a token, returning `None` if it is empty or whitespace.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// The capability the chat session needs from an inference provider.
///
/// Implementations send the request and return the generated text as it arrives.  Failures are
/// returned as classified [`Error`]s, either immediately or as an item of the stream.
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    /// Starts a streaming completion.
    async fn stream_completion(
        &self,
        api_key: &ApiKey,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream>;
}

#[async_trait::async_trait]
impl<T: InferenceClient> InferenceClient for Arc<T> {
    async fn stream_completion(
        &self,
        api_key: &ApiKey,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream> {
        self.as_ref().stream_completion(api_key, request).await
    }
}

/// Client for the Hugging Face chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct HuggingFace {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl HuggingFace {
    /// Create a new client for the default endpoint.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the endpoint the client posts to.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(self.base_url.join("chat/completions")?)
    }

    /// Create and return the headers for a streaming request.
    fn headers(api_key: &ApiKey) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.expose())).map_err(|_| {
            Error::configuration("API key contains characters that cannot be sent in a header")
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // The endpoint answers with either {"error": "..."} or {"error": {"message": ...}}.
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorBody>,
            error_type: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ErrorBody {
            Text(String),
            Detail {
                message: Option<String>,
                #[serde(rename = "type")]
                error_type: Option<String>,
            },
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let (error_type, message) = match parsed {
            Some(ErrorResponse {
                error: Some(ErrorBody::Text(message)),
                error_type,
            }) => (error_type, message),
            Some(ErrorResponse {
                error:
                    Some(ErrorBody::Detail {
                        message,
                        error_type: detail_type,
                    }),
                error_type,
            }) => (
                detail_type.or(error_type),
                message.unwrap_or_else(|| error_body.clone()),
            ),
            _ => (None, error_body.clone()),
        };

        match Error::from_service(Some(status_code), error_type, message) {
            Error::ServiceUnavailable { message, .. } => {
                Error::service_unavailable(message, retry_after)
            }
            err => err,
        }
    }

    /// Send a chat-completion request and get a stream of decoded events.
    pub async fn stream(
        &self,
        api_key: &ApiKey,
        mut request: ChatCompletionRequest,
    ) -> Result<EventStream> {
        request.stream = true;
        let url = self.endpoint()?;
        let headers = Self::headers(api_key)?;

        tracing::debug!(model = %request.model, %url, "sending chat completion request");
        CLIENT_REQUESTS.click();
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {e}"),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
                }
            })?;
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            let status = response.status().as_u16();
            let err = Self::process_error_response(response).await;
            tracing::warn!(status, error = %err, "chat completion request rejected");
            return Err(err);
        }

        Ok(Box::pin(process_sse(response.bytes_stream())))
    }
}

#[async_trait::async_trait]
impl InferenceClient for HuggingFace {
    async fn stream_completion(
        &self,
        api_key: &ApiKey,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream> {
        let started = Instant::now();
        let events = self.stream(api_key, request).await?;
        let mut first_fragment = true;
        let fragments = events.filter_map(move |event| {
            let item = match event {
                Ok(StreamEvent::Chunk(chunk)) => chunk.fragment().map(|f| Ok(f.to_string())),
                Ok(StreamEvent::Done) => {
                    STREAM_DURATION.add(started.elapsed().as_secs_f64());
                    None
                }
                Err(err) => Some(Err(err)),
            };
            match &item {
                Some(Ok(fragment)) => {
                    if first_fragment {
                        STREAM_TTFB.add(started.elapsed().as_secs_f64());
                        first_fragment = false;
                    }
                    STREAM_FRAGMENTS.click();
                    STREAM_BYTES.count(fragment.len() as u64);
                }
                Some(Err(err)) => {
                    STREAM_ERRORS.click();
                    tracing::warn!(error = %err, "chat completion stream failed");
                }
                None => {}
            }
            future::ready(item)
        });
        Ok(Box::pin(fragments))
    }
}
