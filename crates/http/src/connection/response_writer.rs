//! Ordered response writer.
//!
//! The writer only accepts operations in protocol order:
//!
//! ```text
//! Initialized -> StatusWritten -> HeadersWritten -+-> BodyWritten
//!                                                 |
//!                                                 +-> ChunkedWriting (repeat) -> BodyWritten -> TrailersWritten
//! ```
//!
//! Each operation checks the current state before touching the sink and
//! encodes its whole piece before writing it, so an illegal call never leaves
//! partial bytes behind. Trailers are only accepted after a chunked body.

use std::io::Write;
use std::sync::Arc;

use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::{Chunk, ChunkedEncoder, HeaderEncoder};
use crate::protocol::{HeaderMap, SendError, StatusCode, StatusRegistry, WriterState};

const INIT_BUFFER_SIZE: usize = 1024;

/// Headers for a plain text body of `content_length` bytes on a connection
/// that closes after the response.
pub fn default_headers(content_length: usize) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.set("content-length", content_length.to_string());
    headers.set("connection", "close");
    headers.set("content-type", mime::TEXT_PLAIN.as_ref());
    headers
}

/// Writes one response onto a blocking sink.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    header_encoder: HeaderEncoder,
    chunked_encoder: Option<ChunkedEncoder>,
    registry: Arc<StatusRegistry>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_registry(writer, StatusRegistry::shared())
    }

    /// Creates a writer that looks reason phrases up in `registry`.
    pub fn with_registry(writer: W, registry: Arc<StatusRegistry>) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            state: WriterState::Initialized,
            header_encoder: HeaderEncoder,
            chunked_encoder: None,
            registry,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Returns true if nothing has been written yet.
    pub fn is_initialized(&self) -> bool {
        self.state == WriterState::Initialized
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Emits `HTTP/1.1 <code> <reason>\r\n`.
    pub fn write_status_line(&mut self, code: StatusCode) -> Result<(), SendError> {
        self.expect_state("write_status_line", &[WriterState::Initialized])?;

        let reason = self.registry.reason(code);
        self.header_encoder.encode_status_line(code, reason, &mut self.buffer)?;
        self.flush_buffer()?;

        self.transition(WriterState::StatusWritten);
        Ok(())
    }

    /// Emits one `name: value` line per field followed by a blank line.
    pub fn write_headers<I, K, V>(&mut self, headers: I) -> Result<(), SendError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.expect_state("write_headers", &[WriterState::StatusWritten])?;

        self.header_encoder.encode_fields(headers, &mut self.buffer);
        self.flush_buffer()?;

        self.transition(WriterState::HeadersWritten);
        Ok(())
    }

    /// Writes the whole fixed-length body. Can only be called once.
    pub fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state("write_body", &[WriterState::HeadersWritten])?;

        self.writer.write_all(body)?;

        self.transition(WriterState::BodyWritten);
        Ok(body.len())
    }

    /// Writes `body` as one chunk; may be called repeatedly.
    ///
    /// An empty `body` writes nothing, since a zero-size chunk would end the
    /// body early.
    pub fn write_chunked_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state("write_chunked_body", &[WriterState::HeadersWritten, WriterState::ChunkedWriting])?;

        let encoder = self.chunked_encoder.get_or_insert_with(ChunkedEncoder::new);
        encoder.encode(Chunk::Data(body), &mut self.buffer)?;
        self.flush_buffer()?;

        if self.state != WriterState::ChunkedWriting {
            self.transition(WriterState::ChunkedWriting);
        }
        Ok(body.len())
    }

    /// Writes the terminating zero-size chunk.
    ///
    /// The section closing blank line is written by
    /// [`write_trailers`](Self::write_trailers), which may carry no fields.
    pub fn write_chunked_body_done(&mut self) -> Result<(), SendError> {
        self.expect_state("write_chunked_body_done", &[WriterState::ChunkedWriting])?;

        let encoder = self.chunked_encoder.get_or_insert_with(ChunkedEncoder::new);
        encoder.encode(Chunk::Last, &mut self.buffer)?;
        self.flush_buffer()?;

        self.transition(WriterState::BodyWritten);
        Ok(())
    }

    /// Emits the trailer fields and the blank line ending the message.
    ///
    /// Only legal after [`write_chunked_body_done`](Self::write_chunked_body_done);
    /// a fixed-length body has no place for trailers.
    pub fn write_trailers<I, K, V>(&mut self, trailers: I) -> Result<(), SendError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.expect_state("write_trailers", &[WriterState::BodyWritten])?;
        if !self.chunked_encoder.as_ref().is_some_and(ChunkedEncoder::is_finish) {
            return Err(SendError::TrailersWithoutChunkedBody);
        }

        self.header_encoder.encode_fields(trailers, &mut self.buffer);
        self.flush_buffer()?;

        self.transition(WriterState::TrailersWritten);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SendError> {
        Ok(self.writer.flush()?)
    }

    fn expect_state(&self, operation: &'static str, allowed: &[WriterState]) -> Result<(), SendError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SendError::out_of_order(operation, self.state))
        }
    }

    fn flush_buffer(&mut self) -> Result<(), SendError> {
        let result = self.writer.write_all(&self.buffer);
        self.buffer.clear();
        result.map_err(SendError::io)
    }

    fn transition(&mut self, next: WriterState) {
        debug_assert!(next > self.state, "writer state must move forward");
        trace!(from = %self.state, to = %next, "response writer transition");
        self.state = next;
    }
}
