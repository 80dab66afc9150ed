//! HTTP codec module for decoding requests and encoding responses
//!
//! Everything in here is a pure transformation over byte slices and
//! `BytesMut` buffers; reading from and writing to a transport lives in
//! [`connection`](crate::connection).
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: state machine driving the whole request
//!   - [`RequestLineDecoder`]: the first line of the request
//!   - Header parsing via [`HeaderMap::parse`](crate::protocol::HeaderMap::parse)
//!   - Body accumulation via [`LengthDecoder`]
//!
//! - Response handling:
//!   - [`HeaderEncoder`]: status line, header and trailer sections
//!   - [`ChunkedEncoder`]: chunked body framing
//!
//! # Example
//!
//! ```
//! use micro_h1::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut pending = b"GET /index.html HTTP/1.1\r\nHo".to_vec();
//!
//! let consumed = decoder.feed(&pending).unwrap();
//! pending.drain(..consumed);
//! assert_eq!(&pending[..], b"Ho");
//!
//! pending.extend_from_slice(b"st: localhost\r\n\r\n");
//! decoder.feed(&pending).unwrap();
//! let request = decoder.take_request().unwrap();
//! assert_eq!(request.headers().get("Host"), Some("localhost"));
//! ```

mod body;
mod header;
mod request_decoder;
mod request_line_decoder;

pub use body::{Chunk, ChunkedEncoder, LengthDecoder};
pub use header::HeaderEncoder;
pub use request_decoder::RequestDecoder;
pub use request_line_decoder::RequestLineDecoder;
