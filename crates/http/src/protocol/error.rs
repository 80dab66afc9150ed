use std::io;
use thiserror::Error;

use crate::protocol::{ParserState, WriterState};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors produced while turning a byte stream into a [`Request`](crate::protocol::Request).
///
/// The variants fall into three groups:
///
/// - syntax errors: the message itself is malformed and the connection should be abandoned
/// - end of stream errors: the peer stopped sending before the message was complete
/// - transport errors: anything the underlying reader reported, passed through unchanged
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("poorly formatted request-line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("unrecognized http version: {version}")]
    InvalidVersion { version: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("parsing a completed message")]
    CompletedMessage,

    #[error("unexpected eof, message truncated: {reason}")]
    Truncated { reason: String },

    #[error("unexpected eof, incomplete request while {state}")]
    Incomplete { state: ParserState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_version<S: ToString>(version: S) -> Self {
        Self::InvalidVersion { version: version.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn truncated<S: ToString>(str: S) -> Self {
        Self::Truncated { reason: str.to_string() }
    }

    pub fn incomplete(state: ParserState) -> Self {
        Self::Incomplete { state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the bytes received so far do not form a legal message.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequestLine { .. }
                | Self::InvalidMethod { .. }
                | Self::InvalidVersion { .. }
                | Self::InvalidHeader { .. }
                | Self::InvalidContentLength { .. }
        )
    }

    /// Returns true if the stream ended before the message was fully framed.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("{operation} is not allowed after {state}")]
    OutOfOrder { operation: &'static str, state: WriterState },

    #[error("trailers can only follow a chunked body")]
    TrailersWithoutChunkedBody,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn out_of_order(operation: &'static str, state: WriterState) -> Self {
        Self::OutOfOrder { operation, state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the writer was driven in an illegal order.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::OutOfOrder { .. } | Self::TrailersWithoutChunkedBody)
    }
}
