//! Reframing of the upstream completion stream into the client wire format.
//!
//! The upstream speaks newline-delimited `data: {json}` events; the front
//! end expects one `0:"<json-escaped delta>"\n` line per text fragment.
//! Parsing is deliberately lenient: upstream chunk boundaries are not
//! guaranteed to align with event lines, so a line that fails to parse is
//! skipped silently instead of erroring the stream.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use dialogue_protocol::ChatCompletionChunk;
use futures::Stream;
use reasoning_filter::SpanFilter;
use tracing::{error, warn};

use crate::routers::error as router_error;

/// Upstream event line prefix.
const EVENT_PREFIX: &str = "data: ";

/// Upstream end-of-stream sentinel; terminates the stream without
/// producing an output event.
const DONE_SENTINEL: &str = "[DONE]";

/// Client event line prefix.
const OUTPUT_PREFIX: &str = "0:";

/// Cap on the partial-line carry buffer, against upstreams that never
/// send a newline. Overflow drops the buffer and restarts scanning; the
/// stream itself never errors over malformed input.
const MAX_CARRY_BUFFER_SIZE: usize = 64 * 1024;

// ============================================================================
// Line-level reframing
// ============================================================================

/// Stateful chunk-to-event reframer.
///
/// Complete lines are processed as they arrive; a trailing partial line is
/// carried into the next chunk so events split across network reads are
/// still recovered, in arrival order.
pub(crate) struct Reframer {
    carry: String,
    filter: SpanFilter,
}

impl Reframer {
    pub(crate) fn new() -> Self {
        Self {
            carry: String::new(),
            filter: SpanFilter::thinking(),
        }
    }

    /// Feed one decoded upstream chunk, returning the reframed output
    /// bytes it completes (possibly empty, possibly several events).
    pub(crate) fn process_chunk(&mut self, text: &str) -> String {
        self.carry.push_str(text);

        let mut out = String::new();
        while let Some(newline) = self.carry.find('\n') {
            let line: String = self.carry.drain(..=newline).collect();
            self.process_line(&line, &mut out);
        }

        if self.carry.len() > MAX_CARRY_BUFFER_SIZE {
            warn!(
                buffered = self.carry.len(),
                "carry buffer overflow, dropping partial line"
            );
            self.carry.clear();
        }
        out
    }

    /// Flush the final unterminated line once the upstream closes.
    pub(crate) fn finish(&mut self) -> String {
        let mut out = String::new();
        if !self.carry.is_empty() {
            let line = std::mem::take(&mut self.carry);
            self.process_line(&line, &mut out);
        }
        out
    }

    fn process_line(&self, line: &str, out: &mut String) {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return;
        }

        // Keep-alive comments and other non-data lines are ignored.
        let Some(payload) = line.strip_prefix(EVENT_PREFIX) else {
            return;
        };
        if payload == DONE_SENTINEL {
            return;
        }

        // Malformed or partial JSON is skipped, never surfaced.
        let Ok(chunk) = serde_json::from_str::<ChatCompletionChunk>(payload) else {
            return;
        };
        let Some(content) = chunk.delta_content() else {
            return;
        };
        if content.is_empty() {
            return;
        }

        let filtered = self.filter.strip(content);
        if filtered.is_empty() {
            return;
        }

        let Ok(encoded) = serde_json::to_string(filtered.as_ref()) else {
            return;
        };
        out.push_str(OUTPUT_PREFIX);
        out.push_str(&encoded);
        out.push('\n');
    }
}

// ============================================================================
// Stream adapter
// ============================================================================

/// Stream wrapper that reframes upstream bytes into client events.
///
/// An upstream read error ends the response body: once streaming has
/// begun there is no status code left to change, so the error is
/// propagated as stream termination and the client treats stream-end as
/// completion.
pub(crate) struct ReframedStream<S> {
    inner: Pin<Box<S>>,
    reframer: Reframer,
    done: bool,
}

impl<S> ReframedStream<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>>,
{
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner: Box::pin(inner),
            reframer: Reframer::new(),
            done: false,
        }
    }
}

impl<S> Stream for ReframedStream<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>>,
{
    type Item = Result<Bytes, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    let out = self.reframer.process_chunk(&text);
                    if !out.is_empty() {
                        return Poll::Ready(Some(Ok(Bytes::from(out))));
                    }
                    // Chunk produced no events; keep reading.
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    warn!(error = %e, "upstream stream error, ending response stream");
                    return Poll::Ready(Some(Err(io::Error::other(e.to_string()))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    let out = self.reframer.finish();
                    if !out.is_empty() {
                        return Poll::Ready(Some(Ok(Bytes::from(out))));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Wrap a successful upstream response into the streaming HTTP response.
///
/// Chunked transfer encoding is applied by the HTTP layer for streamed
/// bodies, so it is not declared by hand here.
pub(crate) fn build_streaming_response(upstream: reqwest::Response) -> Response {
    let stream = ReframedStream::new(upstream.bytes_stream());
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
        .header(header::CONNECTION, HeaderValue::from_static("keep-alive"))
        .body(body)
        .unwrap_or_else(|e| {
            error!("Failed to build streaming response: {}", e);
            router_error::internal_error("Internal server error")
        })
}
