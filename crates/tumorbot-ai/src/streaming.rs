//! Server-Sent Events (SSE) streaming parser.
//!
//! Cohere's chat endpoint streams replies as SSE when `"stream": true` is
//! set. `SseParser` turns raw lines into events; `parse_sse_stream` drives
//! it over a reqwest response body.

use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type (e.g., "content-delta", "message-end").
    pub event: Option<String>,
    /// The event data (JSON string).
    pub data: String,
}

/// Incremental line-oriented SSE parser.
#[derive(Debug, Default)]
pub struct SseParser {
    current_event: Option<String>,
    current_data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its trailing newline). Returns an event when
    /// the line terminates one.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            // Empty line = end of event
            let event = self.current_event.take();
            if self.current_data.is_empty() {
                return None;
            }
            return Some(SseEvent {
                event,
                data: std::mem::take(&mut self.current_data),
            });
        }

        if let Some(event_type) = field(line, "event") {
            self.current_event = Some(event_type.to_string());
        } else if let Some(data) = field(line, "data") {
            if !self.current_data.is_empty() {
                self.current_data.push('\n');
            }
            self.current_data.push_str(data);
        }
        // Ignore other fields (id:, retry:, comments)
        None
    }

    /// Flush a trailing event when the stream ends without a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.push_line("")
    }
}

fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), crate::AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();
    let mut parser = SseParser::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| crate::AiError::NetworkError(e.to_string()))?
    {
        if let Some(event) = parser.push_line(&line) {
            on_event(event);
        }
    }

    if let Some(event) = parser.finish() {
        on_event(event);
    }

    Ok(())
}
