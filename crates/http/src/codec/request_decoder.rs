//! HTTP request decoder module
//!
//! This module turns a stream of bytes into a [`Request`] without performing
//! any I/O itself. The caller hands over the unconsumed bytes it has, the
//! decoder reports how many of them it used, and the caller drops those bytes
//! before the next call.
//!
//! # State Machine
//!
//! ```text
//! Initialized --request-line--> ParsingHeaders --blank line--> ParsingBody --content-length--> Done
//! ```
//!
//! - `Initialized`: delegates to [`RequestLineDecoder`]
//! - `ParsingHeaders`: delegates to [`HeaderMap::parse`], one line per step
//! - `ParsingBody`: completes immediately when `content-length` is absent or
//!   zero, otherwise accumulates exactly that many bytes through [`LengthDecoder`]
//! - `Done`: further input is rejected
//!
//! # Example
//!
//! ```
//! use micro_h1::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let consumed = decoder.feed(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n").unwrap();
//!
//! assert_eq!(consumed, 27);
//! let request = decoder.take_request().unwrap();
//! assert_eq!(request.target(), "/");
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::LengthDecoder;
use crate::codec::request_line_decoder::RequestLineDecoder;
use crate::ensure;
use crate::protocol::{HeaderMap, ParseError, ParserState, Request, RequestLine};

const CONTENT_LENGTH: &str = "content-length";

/// Incremental decoder for a single HTTP/1.1 request.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    state: ParserState,
    request_line_decoder: RequestLineDecoder,
    request_line: Option<RequestLine>,
    headers: HeaderMap,
    payload_decoder: Option<LengthDecoder>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Feeds the unconsumed bytes to the decoder.
    ///
    /// Sub-parses run until the message is complete or one of them cannot make
    /// progress with the bytes at hand.
    ///
    /// # Returns
    ///
    /// The number of bytes consumed from the front of `src`. Zero means more
    /// data is needed; the caller must keep the unconsumed tail and append to it.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for a malformed message and
    /// `ParseError::CompletedMessage` when called after the message is done.
    pub fn feed(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        ensure!(!self.state.is_done(), ParseError::CompletedMessage);

        let mut consumed = 0;
        while !self.state.is_done() {
            let state = self.state;
            let n = self.feed_single(&src[consumed..])?;
            consumed += n;

            if n == 0 && self.state == state {
                break;
            }
        }

        Ok(consumed)
    }

    fn feed_single(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => match self.request_line_decoder.decode(src)? {
                Some((request_line, consumed)) => {
                    self.request_line = Some(request_line);
                    self.transition(ParserState::ParsingHeaders);
                    Ok(consumed)
                }
                None => Ok(0),
            },

            ParserState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse(src)?;
                if done {
                    self.transition(ParserState::ParsingBody);
                }
                Ok(consumed)
            }

            ParserState::ParsingBody => {
                let mut payload_decoder = match self.payload_decoder.take() {
                    Some(payload_decoder) => payload_decoder,
                    None => match parse_content_length(&self.headers)? {
                        None | Some(0) => {
                            self.transition(ParserState::Done);
                            return Ok(0);
                        }
                        Some(length) => LengthDecoder::new(length),
                    },
                };

                let consumed = payload_decoder.decode(src);
                let finished = payload_decoder.is_finished();
                self.payload_decoder = Some(payload_decoder);

                if finished {
                    self.transition(ParserState::Done);
                }
                Ok(consumed)
            }

            ParserState::Done => Err(ParseError::CompletedMessage),
        }
    }

    fn transition(&mut self, next: ParserState) {
        debug_assert!(next > self.state, "parser state must move forward");
        trace!(from = %self.state, to = %next, "request decoder transition");
        self.state = next;
    }

    /// Hands out the finished request and resets the decoder.
    ///
    /// Returns `None` while the message is still incomplete.
    pub fn take_request(&mut self) -> Option<Request> {
        if !self.state.is_done() {
            return None;
        }

        let decoder = mem::take(self);
        let request_line = decoder.request_line?;
        let body = decoder.payload_decoder.map(LengthDecoder::into_body).unwrap_or_default();

        debug!(method = request_line.method(), target = request_line.target(), body_size = body.len(), "request decoded");
        Some(Request::new(request_line, decoder.headers, body))
    }

    /// Classifies an end of stream that arrived before the message was done.
    ///
    /// `stalled` tells whether the last feed left bytes behind without
    /// consuming any of them, i.e. the stream stopped inside a line.
    pub(crate) fn eof_error(&self, stalled: bool) -> ParseError {
        match (&self.state, &self.payload_decoder) {
            (ParserState::ParsingBody, Some(payload_decoder)) => ParseError::truncated(format!(
                "expected {} body bytes, received {}",
                payload_decoder.expected(),
                payload_decoder.received()
            )),
            (state, _) if stalled => ParseError::truncated(format!("stream ended inside a line while {state}")),
            (state, _) => ParseError::incomplete(*state),
        }
    }
}

/// Reads the declared body length, `None` if the header is absent.
fn parse_content_length(headers: &HeaderMap) -> Result<Option<u64>, ParseError> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(None);
    };

    ensure!(
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
        ParseError::invalid_content_length(format!("value {value} is not a non-negative integer"))
    );

    value.parse::<u64>().map(Some).map_err(|e| ParseError::invalid_content_length(format!("value {value} is not u64, {e}")))
}

/// Adapts the decoder to `tokio_util` framing, yielding one [`Request`] once
/// it is complete.
impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let consumed = self.feed(&src[..])?;
        src.advance(consumed);
        Ok(self.take_request())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // peer closed between messages
        if self.state == ParserState::Initialized && src.is_empty() {
            return Ok(None);
        }

        let consumed = self.feed(&src[..])?;
        src.advance(consumed);
        if let Some(request) = self.take_request() {
            return Ok(Some(request));
        }

        Err(self.eof_error(consumed == 0 && !src.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    /// Feeds `src` in pieces of `chunk_size`, keeping the unconsumed tail the
    /// way a reading loop does.
    fn decode_in_chunks(src: &[u8], chunk_size: usize) -> Result<Request, ParseError> {
        let mut decoder = RequestDecoder::new();
        let mut pending = Vec::new();

        for chunk in src.chunks(chunk_size) {
            pending.extend_from_slice(chunk);
            let consumed = decoder.feed(&pending)?;
            pending.drain(..consumed);

            if let Some(request) = decoder.take_request() {
                return Ok(request);
            }
        }

        Err(decoder.eof_error(!pending.is_empty()))
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##}
        .replace('\n', "\r\n");

        let mut decoder = RequestDecoder::new();
        let consumed = decoder.feed(str.as_bytes()).unwrap();
        assert_eq!(consumed, str.len());
        assert!(decoder.is_done());

        let request = decoder.take_request().unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/index.html");
        assert_eq!(request.request_line().version(), "1.1");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("127.0.0.1:8080"));
        assert_eq!(request.headers().get("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn three_bytes_at_a_time() {
        let request = decode_in_chunks(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n", 3).unwrap();

        assert_eq!(request.request_line().method(), "GET");
        assert_eq!(request.request_line().target(), "/");
        assert_eq!(request.request_line().version(), "1.1");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("host"), Some("a"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn chunk_boundaries_do_not_matter() {
        let src = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\nX-A: 1\r\nx-a: 2\r\n\r\nhello world!\n";
        let whole = decode_in_chunks(src, src.len()).unwrap();

        for chunk_size in 1..src.len() {
            let split = decode_in_chunks(src, chunk_size).unwrap();
            assert_eq!(split, whole, "chunk size {chunk_size}");
        }

        assert_eq!(&whole.body()[..], b"hello world!\n");
        assert_eq!(whole.headers().get("x-a"), Some("1, 2"));
    }

    #[test]
    fn need_more_data_consumes_nothing() {
        let mut decoder = RequestDecoder::new();

        assert_eq!(decoder.feed(b"GET / HT").unwrap(), 0);
        assert_eq!(decoder.state(), ParserState::Initialized);

        assert_eq!(decoder.feed(b"GET / HTTP/1.1\r\nHo").unwrap(), 16);
        assert_eq!(decoder.state(), ParserState::ParsingHeaders);

        assert_eq!(decoder.feed(b"Ho").unwrap(), 0);
        assert_eq!(decoder.state(), ParserState::ParsingHeaders);
    }

    #[test]
    fn body_is_bounded_by_content_length() {
        let mut decoder = RequestDecoder::new();
        let src = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";

        let consumed = decoder.feed(src).unwrap();
        assert_eq!(consumed, src.len() - 5);

        let request = decoder.take_request().unwrap();
        assert_eq!(&request.body()[..], b"hello");
    }

    #[test]
    fn partial_body_waits() {
        let mut decoder = RequestDecoder::new();
        let src = b"POST / HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial";

        assert_eq!(decoder.feed(src).unwrap(), src.len());
        assert_eq!(decoder.state(), ParserState::ParsingBody);
        assert!(decoder.take_request().is_none());

        assert_eq!(decoder.feed(b"").unwrap(), 0);
        assert_eq!(decoder.state(), ParserState::ParsingBody);
    }

    #[test]
    fn zero_content_length_completes_immediately() {
        let mut decoder = RequestDecoder::new();
        let src = b"GET / HTTP/1.1\r\nContent-Length: 0\r\n\r\n";

        assert_eq!(decoder.feed(src).unwrap(), src.len());
        assert!(decoder.is_done());
        assert!(decoder.take_request().unwrap().body().is_empty());
    }

    #[test]
    fn headers_end_exactly_at_buffer_end() {
        let mut decoder = RequestDecoder::new();
        assert_eq!(decoder.feed(b"GET / HTTP/1.1\r\n").unwrap(), 16);
        assert_eq!(decoder.feed(b"\r\n").unwrap(), 2);
        assert!(decoder.is_done());
    }

    #[test]
    fn feeding_completed_message_fails() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        let err = decoder.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::CompletedMessage));
    }

    #[test]
    fn invalid_content_length() {
        let mut decoder = RequestDecoder::new();
        let err = decoder.feed(b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength { .. }));

        let mut decoder = RequestDecoder::new();
        let err = decoder.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\nContent-Length: 5\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength { .. }));
        assert!(err.is_syntax());
    }

    #[test]
    fn syntax_errors_surface_from_sub_decoders() {
        let mut decoder = RequestDecoder::new();
        let err = decoder.feed(b"GET / HTTP/1.1\r\nFoo Bar: 1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeader { .. }));

        let mut decoder = RequestDecoder::new();
        let err = decoder.feed(b"get / HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidMethod { .. }));
    }

    #[test]
    fn non_utf8_target_and_value_are_kept() {
        let src = b"GET /caf\xe9 HTTP/1.1\r\nX-Name: caf\xe9\r\n\r\n";

        for chunk_size in [1, 3, src.len()] {
            let request = decode_in_chunks(src, chunk_size).unwrap();
            assert_eq!(request.target(), "/caf\u{FFFD}");
            assert_eq!(request.headers().get("x-name"), Some("caf\u{FFFD}"));
            assert!(request.body().is_empty());
        }
    }

    #[test]
    fn eof_classification() {
        let err = decode_in_chunks(b"POST / HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial", 4).unwrap_err();
        assert!(err.is_truncation());
        assert_eq!(err.to_string(), "unexpected eof, message truncated: expected 20 body bytes, received 7");

        let err = decode_in_chunks(b"GET / HTTP/1.1\r\nHost: loc", 4).unwrap_err();
        assert!(err.is_truncation());

        let err = decode_in_chunks(b"GET / HTTP/1.1\r\nHost: a\r\n", 4).unwrap_err();
        assert!(matches!(err, ParseError::Incomplete { state: ParserState::ParsingHeaders }));
    }

    #[test]
    fn tokio_decoder_advances_buffer() {
        let mut decoder = RequestDecoder::new();
        let mut src = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nab"[..]);

        assert!(decoder.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());

        src.extend_from_slice(b"cGET");
        let request = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(&request.body()[..], b"abc");
        assert_eq!(&src[..], b"GET");
        assert_eq!(decoder.state(), ParserState::Initialized);
    }

    #[test]
    fn tokio_decoder_eof() {
        let mut decoder = RequestDecoder::new();
        assert!(decoder.decode_eof(&mut BytesMut::new()).unwrap().is_none());

        let mut decoder = RequestDecoder::new();
        let mut src = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nab"[..]);
        assert!(decoder.decode(&mut src).unwrap().is_none());
        assert!(decoder.decode_eof(&mut src).unwrap_err().is_truncation());
    }
}
