//! Decoder implementation for request bodies framed by a Content-Length header.
//!
//! The body is accumulated in place: each call takes as many bytes as are both
//! available and still owed, and never reads past the declared length.

use std::cmp;

use bytes::{Bytes, BytesMut};
use tracing::trace;

/// Upper bound for the up-front body allocation. Bodies larger than this
/// still decode, the buffer simply grows as bytes arrive.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// A decoder for a body with a known content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The declared content length
    expected: u64,
    /// Bytes received so far
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a new `LengthDecoder` with its buffer sized for `expected` bytes.
    pub fn new(expected: u64) -> Self {
        let capacity = usize::try_from(cmp::min(expected, MAX_PREALLOC)).unwrap_or(0);
        Self { expected, body: BytesMut::with_capacity(capacity) }
    }

    /// Appends the front of `src` to the body, returning how many bytes were taken.
    pub fn decode(&mut self, src: &[u8]) -> usize {
        let remaining = self.remaining();
        let len = usize::try_from(remaining).map_or(src.len(), |remaining| cmp::min(remaining, src.len()));

        self.body.extend_from_slice(&src[..len]);
        trace!(taken = len, remaining = self.remaining(), "decoded body bytes");
        len
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    pub fn received(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn remaining(&self) -> u64 {
        self.expected - self.received()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}
