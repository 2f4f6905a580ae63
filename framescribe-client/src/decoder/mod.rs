//! Incremental decoder for the video-analysis event stream
//!
//! The backend answers the upload with a long-lived body of `data: <json>`
//! lines. Chunks arrive at arbitrary byte boundaries, so the decoder keeps
//! the unterminated tail between chunks and only decodes complete lines.
//! Lines are split on the `\n` byte before UTF-8 decoding, which keeps
//! multi-byte characters that straddle two chunks intact.
//!
//! Malformed lines are dropped (logged at debug). The `[DONE]` sentinel ends
//! the sequence. An unterminated tail at end of stream is discarded.

use crate::error::{DecodeError, FrameParseError};
use async_stream::stream;
use framescribe_common::events::StreamEvent;
use futures::stream::{BoxStream, Stream, StreamExt};
use tracing::debug;

/// Raw body chunks of the event stream
pub type ChunkStream = BoxStream<'static, Result<Vec<u8>, DecodeError>>;

/// Marker every event line starts with
const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the stream
const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedFrame {
    Event(StreamEvent),
    /// `[DONE]` sentinel; nothing follows it
    Terminal,
}

/// Decode a single complete line.
///
/// Returns `None` for lines that carry no event (blank lines, comments,
/// anything without the `data: ` marker).
pub fn parse_line(line: &str) -> Option<Result<DecodedFrame, FrameParseError>> {
    let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();

    if payload == DONE_SENTINEL {
        return Some(Ok(DecodedFrame::Terminal));
    }

    Some(
        serde_json::from_str::<StreamEvent>(payload)
            .map(DecodedFrame::Event)
            .map_err(FrameParseError::from),
    )
}

/// Stateful line decoder fed with raw byte chunks
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes after the last `\n` seen so far
    buffer: Vec<u8>,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and decode every line it completes.
    ///
    /// After the sentinel has been seen, further input is ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<DecodedFrame> {
        if self.finished {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let parsed = {
                let line = String::from_utf8_lossy(&self.buffer[start..end]);
                parse_line(&line)
            };
            start = end + 1;

            match parsed {
                None => {}
                Some(Ok(DecodedFrame::Terminal)) => {
                    self.finished = true;
                    frames.push(DecodedFrame::Terminal);
                    break;
                }
                Some(Ok(frame)) => frames.push(frame),
                Some(Err(e)) => {
                    debug!(error = %e, "Dropping malformed stream line");
                }
            }
        }

        if self.finished {
            self.buffer.clear();
        } else {
            self.buffer.drain(..start);
        }

        frames
    }

    /// Whether the sentinel has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes held back waiting for a line terminator
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

/// Turn a stream of body chunks into an ordered sequence of events.
///
/// Ends at end of input or at the sentinel. A chunk read failure is yielded
/// once and ends the sequence.
pub fn decode_stream<S, B>(chunks: S) -> impl Stream<Item = Result<StreamEvent, DecodeError>>
where
    S: Stream<Item = Result<B, DecodeError>>,
    B: AsRef<[u8]>,
{
    stream! {
        let mut decoder = FrameDecoder::new();
        futures::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for frame in decoder.feed(chunk.as_ref()) {
                match frame {
                    DecodedFrame::Event(event) => yield Ok(event),
                    DecodedFrame::Terminal => return,
                }
            }
        }

        if decoder.pending_bytes() > 0 {
            debug!(
                bytes = decoder.pending_bytes(),
                "Discarding unterminated tail at end of stream"
            );
        }
    }
}
