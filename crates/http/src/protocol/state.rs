//! Progress markers for the request parser and the response writer.
//!
//! Both machines only ever move forward. The derived `Ord` follows declaration
//! order, so a transition is legal only when it does not go backwards.

use std::fmt;

/// Where the request parser currently is within a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ParserState {
    /// Waiting for the request-line
    #[default]
    Initialized,
    /// Request-line parsed, reading header lines
    ParsingHeaders,
    /// Header section terminated, accumulating the body
    ParsingBody,
    /// The message is complete
    Done,
}

impl ParserState {
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, ParserState::Done)
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParserState::Initialized => "waiting for request-line",
            ParserState::ParsingHeaders => "parsing headers",
            ParserState::ParsingBody => "parsing body",
            ParserState::Done => "done",
        };
        f.write_str(s)
    }
}

/// What the response writer has emitted so far.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WriterState {
    #[default]
    Initialized,
    StatusWritten,
    HeadersWritten,
    ChunkedWriting,
    BodyWritten,
    TrailersWritten,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriterState::Initialized => "initialized",
            WriterState::StatusWritten => "status written",
            WriterState::HeadersWritten => "headers written",
            WriterState::ChunkedWriting => "chunked writing",
            WriterState::BodyWritten => "body written",
            WriterState::TrailersWritten => "trailers written",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_ordered() {
        assert!(ParserState::Initialized < ParserState::ParsingHeaders);
        assert!(ParserState::ParsingBody < ParserState::Done);
        assert!(WriterState::HeadersWritten < WriterState::ChunkedWriting);
        assert!(WriterState::BodyWritten < WriterState::TrailersWritten);
    }

    #[test]
    fn default_is_initialized() {
        assert_eq!(ParserState::default(), ParserState::Initialized);
        assert_eq!(WriterState::default(), WriterState::Initialized);
        assert!(!ParserState::ParsingBody.is_done());
        assert!(ParserState::Done.is_done());
    }
}
