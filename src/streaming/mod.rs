// Server-sent events decoding for streamed model responses
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::error::VotaResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental SSE parser. Feed it raw byte chunks in arrival order; it
/// returns every event completed by that chunk.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        // Lines are split on raw bytes so multi-byte characters cut across
        // chunk boundaries survive
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.take_event() {
                    events.push(event);
                }
                continue;
            }

            // Comment line
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
                None => (line, ""),
            };

            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        events
    }

    /// Flushes whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let mut rest = std::mem::take(&mut self.buffer);
            rest.push(b'\n');
            events = self.feed(&rest);
        }
        events.extend(self.take_event());
        events
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() && self.event.is_none() {
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}

pub type SseStream = Pin<Box<dyn Stream<Item = VotaResult<SseEvent>> + Send>>;

/// Turns a byte stream (e.g. `reqwest::Response::bytes_stream`) into SSE events.
pub fn sse_events<S, E>(bytes: S) -> SseStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<crate::error::VotaError> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut bytes = Box::pin(bytes);

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for event in decoder.feed(&chunk) {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            }
        }

        for event in decoder.finish() {
            yield Ok(event);
        }
    };

    Box::pin(stream)
}
