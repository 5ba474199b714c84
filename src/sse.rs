//! Server-Sent Events (SSE) processing for streaming chat completions.
//!
//! This module turns the raw byte stream of a streaming chat-completion response into a stream
//! of [`StreamEvent`]s.  Events are separated by blank lines; each carries one or more `data:`
//! lines.  `data: [DONE]` ends the stream.  Errors reported inside the stream are classified
//! here, the same way error statuses are classified by the client.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::types::{ChatCompletionChunk, StreamErrorPayload};
use crate::{Error, Result};

const DONE_MARKER: &str = "[DONE]";

/// An event decoded from a chat-completion stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of the completion.
    Chunk(ChatCompletionChunk),
    /// The server signalled the end of the stream.
    Done,
}

/// Process a stream of bytes into a stream of server-sent events.
///
/// The returned stream ends after the `[DONE]` marker or when the byte stream ends, whichever
/// comes first.  Comment lines and events without data are skipped.
pub fn process_sse<S, E>(byte_stream: S) -> impl Stream<Item = Result<StreamEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    stream::unfold(
        (stream, Vec::<u8>::new(), false),
        move |(mut stream, mut buffer, done)| async move {
            if done {
                return None;
            }
            loop {
                while let Some(raw) = take_event(&mut buffer) {
                    if let Some(event) = parse_event(&raw) {
                        let done = matches!(event, Ok(StreamEvent::Done));
                        return Some((event, (stream, buffer, done)));
                    }
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend(bytes.iter().copied().filter(|b| *b != b'\r'));
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer, true)));
                    }
                    None => {
                        // The server may close without a trailing blank line.
                        if buffer.iter().any(|b| !b.is_ascii_whitespace()) {
                            let raw = std::mem::take(&mut buffer);
                            if let Some(event) = parse_event(&raw) {
                                return Some((event, (stream, buffer, true)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Removes one complete event from the front of the buffer.
fn take_event(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let end = buffer.windows(2).position(|w| w == b"\n\n")?;
    let mut raw: Vec<u8> = buffer.drain(..end + 2).collect();
    raw.truncate(end);
    Some(raw)
}

/// Parses one event.  Returns `None` for events that carry nothing to deliver.
fn parse_event(raw: &[u8]) -> Option<Result<StreamEvent>> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => return Some(Err(e.into())),
    };

    let mut event_type = None;
    let mut data: Option<String> = None;
    for line in text.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event_type = Some(value.to_string()),
            "data" => match data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => data = Some(value.to_string()),
            },
            _ => {}
        }
    }

    let data = data?;
    let data = data.trim();
    if event_type.as_deref() == Some("error") {
        return Some(Err(stream_error(data)));
    }
    if data == DONE_MARKER {
        return Some(Ok(StreamEvent::Done));
    }
    if data.is_empty() {
        return None;
    }
    if let Ok(payload) = serde_json::from_str::<StreamErrorPayload>(data) {
        return Some(Err(Error::from_service(
            None,
            payload.error_type().map(String::from),
            payload.message().to_string(),
        )));
    }
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => Some(Ok(StreamEvent::Chunk(chunk))),
        Err(e) => Some(Err(Error::serialization(
            format!("Failed to parse event JSON: {e}"),
            Some(Box::new(e)),
        ))),
    }
}

fn stream_error(data: &str) -> Error {
    match serde_json::from_str::<StreamErrorPayload>(data) {
        Ok(payload) => Error::from_service(
            None,
            payload.error_type().map(String::from),
            payload.message().to_string(),
        ),
        Err(_) => Error::from_service(None, Some("stream_error".to_string()), data.to_string()),
    }
}
