//! Parsed request types.
//!
//! A [`Request`] is only ever handed out once the parser has reached
//! [`ParserState::Done`](crate::protocol::ParserState::Done); until then its
//! pieces live inside the decoder.

use bytes::Bytes;

use crate::protocol::HeaderMap;

/// The only protocol version accepted on the request-line.
pub const HTTP_VERSION: &str = "1.1";

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
///
/// Invalid input never produces a value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub(crate) fn new(method: String, target: String, version: String) -> Self {
        Self { method, target, version }
    }

    /// Returns the method token, one or more uppercase ASCII letters.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request target exactly as it was sent.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the version without the `HTTP/` prefix, always `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A fully parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: HeaderMap, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body, empty when no `content-length` was declared.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestLine, HeaderMap, Bytes) {
        (self.request_line, self.headers, self.body)
    }
}
