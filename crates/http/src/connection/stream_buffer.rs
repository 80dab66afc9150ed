//! Blocking read loop feeding the request decoder.
//!
//! The buffer starts small and doubles whenever it is full. After every feed
//! the consumed prefix is dropped by moving the unconsumed tail to the front,
//! so bytes are never handed to the decoder twice.

use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, Request};

/// Reads one request from `reader`.
///
/// # Errors
///
/// - syntax errors from the decoder
/// - `ParseError::Truncated` when the stream ends inside a line or before the
///   declared body length arrived
/// - `ParseError::Incomplete` when the stream ends between lines
/// - `ParseError::Io` for any other read failure
pub fn parse_message<R: Read>(reader: R) -> Result<Request, ParseError> {
    StreamBuffer::new(reader).read_request()
}

/// Growable buffer between a blocking reader and a [`RequestDecoder`].
#[derive(Debug)]
pub struct StreamBuffer<R> {
    reader: R,
    buffer: BytesMut,
    filled: usize,
}

impl<R: Read> StreamBuffer<R> {
    /// Initial buffer size; doubled whenever the buffer fills up
    pub const INIT_CAPACITY: usize = 8;

    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, Self::INIT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: BytesMut::zeroed(capacity.max(1)), filled: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes read from the stream but not consumed by the decoder.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[..self.filled]
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads until a complete request has been decoded.
    pub fn read_request(&mut self) -> Result<Request, ParseError> {
        let mut decoder = RequestDecoder::new();

        loop {
            if self.filled == self.buffer.len() {
                self.grow();
            }

            let read = match self.reader.read(&mut self.buffer[self.filled..]) {
                Ok(0) => return self.finish(&mut decoder),
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.filled += read;

            let consumed = decoder.feed(&self.buffer[..self.filled])?;
            self.compact(consumed);

            if let Some(request) = decoder.take_request() {
                return Ok(request);
            }
        }
    }

    fn finish(&mut self, decoder: &mut RequestDecoder) -> Result<Request, ParseError> {
        let consumed = if self.filled > 0 {
            let consumed = decoder.feed(&self.buffer[..self.filled])?;
            self.compact(consumed);
            consumed
        } else {
            0
        };

        if let Some(request) = decoder.take_request() {
            return Ok(request);
        }

        let err = decoder.eof_error(consumed == 0 && self.filled > 0);
        debug!(cause = %err, "stream ended before the request completed");
        Err(err)
    }

    fn grow(&mut self) {
        let capacity = self.buffer.len() * 2;
        trace!(from = self.buffer.len(), to = capacity, "grow stream buffer");
        self.buffer.resize(capacity, 0);
    }

    fn compact(&mut self, consumed: usize) {
        if consumed == 0 {
            return;
        }

        self.buffer.copy_within(consumed..self.filled, 0);
        self.filled -= consumed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ParserState;
    use std::cmp;
    use std::io;

    /// Reader handing out at most `num_bytes_per_read` bytes per call.
    struct ChunkReader {
        data: Vec<u8>,
        num_bytes_per_read: usize,
        pos: usize,
    }

    impl ChunkReader {
        fn new(data: &[u8], num_bytes_per_read: usize) -> Self {
            Self { data: data.to_vec(), num_bytes_per_read, pos: 0 }
        }
    }

    impl Read for ChunkReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = cmp::min(cmp::min(self.pos + self.num_bytes_per_read, self.data.len()), self.pos + buf.len());
            let n = end - self.pos;
            buf[..n].copy_from_slice(&self.data[self.pos..end]);
            self.pos = end;
            Ok(n)
        }
    }

    /// Reader that fails once its data is exhausted.
    struct FailingReader {
        inner: ChunkReader,
        kind: ErrorKind,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.inner.read(buf)? {
                0 => Err(io::Error::from(self.kind)),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn good_get_request_line() {
        let reader = ChunkReader::new(
            b"GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n",
            3,
        );
        let request = parse_message(reader).unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/");
        assert_eq!(request.request_line().version(), "1.1");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[test]
    fn every_read_size_gives_same_request() {
        let src = b"POST /coffee HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 22\r\n\r\n{\"flavor\":\"dark mode\"}";
        let expected = parse_message(&src[..]).unwrap();

        for num_bytes_per_read in 1..=src.len() {
            let request = parse_message(ChunkReader::new(src, num_bytes_per_read)).unwrap();
            assert_eq!(request, expected, "read size {num_bytes_per_read}");
        }

        assert_eq!(&expected.body()[..], b"{\"flavor\":\"dark mode\"}");
    }

    #[test]
    fn buffer_grows_for_long_lines() {
        let target = format!("/{}", "a".repeat(100));
        let src = format!("GET {target} HTTP/1.1\r\n\r\n");

        let mut stream = StreamBuffer::new(ChunkReader::new(src.as_bytes(), 5));
        let request = stream.read_request().unwrap();

        assert_eq!(request.target(), target);
        assert!(stream.capacity() >= 64);
        assert!(stream.buffered().is_empty());
    }

    #[test]
    fn unconsumed_bytes_stay_buffered() {
        let mut stream = StreamBuffer::with_capacity(&b"GET / HTTP/1.1\r\n\r\nleftover"[..], 64);
        stream.read_request().unwrap();

        assert_eq!(stream.buffered(), b"leftover");
    }

    #[test]
    fn empty_body_without_content_length() {
        let request = parse_message(ChunkReader::new(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n", 2)).unwrap();
        assert!(request.body().is_empty());
    }

    #[test]
    fn short_body_is_truncation() {
        let reader = ChunkReader::new(b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 20\r\n\r\npartial content", 3);
        let err = parse_message(reader).unwrap_err();

        assert!(err.is_truncation());
        assert!(!err.is_syntax());
    }

    #[test]
    fn eof_inside_header_line_is_truncation() {
        let err = parse_message(ChunkReader::new(b"GET / HTTP/1.1\r\nHost: local", 4)).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn eof_between_lines_is_incomplete() {
        let err = parse_message(ChunkReader::new(b"GET / HTTP/1.1\r\nHost: a\r\n", 4)).unwrap_err();
        assert!(matches!(err, ParseError::Incomplete { state: ParserState::ParsingHeaders }));

        let err = parse_message(io::empty()).unwrap_err();
        assert!(matches!(err, ParseError::Incomplete { state: ParserState::Initialized }));
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_message(ChunkReader::new(b"GET / HTTP/1.1\r\nFoo Bar: 1\r\n\r\n", 3)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeader { .. }));
    }

    #[test]
    fn read_errors_propagate() {
        let reader = FailingReader { inner: ChunkReader::new(b"GET / HTTP/1.1\r\n", 4), kind: ErrorKind::ConnectionReset };
        let err = parse_message(reader).unwrap_err();

        match err {
            ParseError::Io { source } => assert_eq!(source.kind(), ErrorKind::ConnectionReset),
            e => panic!("unexpected error {e}"),
        }
    }
}
