//! An incremental HTTP/1.1 request parser paired with an ordered response writer
//!
//! This crate reconstructs request framing from a byte stream whose read
//! boundaries never line up with protocol boundaries, and emits responses
//! through a writer that refuses to produce malformed messages.
//!
//! # Features
//!
//! - Incremental request parsing, independent of how the input is split
//! - Case-insensitive headers, repeated names merged with `", "`
//! - Bodies framed by `Content-Length`
//! - Blocking (`std::io`) and async (`tokio`) request reading
//! - Fixed-length and chunked response bodies, with trailers after chunked bodies
//! - An open table of status reason phrases
//!
//! # Example
//!
//! ```
//! use micro_h1::connection::{ResponseWriter, parse_message};
//! use micro_h1::protocol::StatusCode;
//!
//! let request = parse_message(&b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]).unwrap();
//! assert_eq!(request.target(), "/hello");
//! assert_eq!(request.headers().get("HOST"), Some("localhost"));
//!
//! let mut writer = ResponseWriter::new(Vec::new());
//! writer.write_status_line(StatusCode::OK).unwrap();
//! writer.write_headers([("content-length", "5")]).unwrap();
//! writer.write_body(b"hello").unwrap();
//!
//! assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nhello");
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: Protocol types, states and errors
//! - [`codec`]: Pure decoding/encoding over byte buffers
//! - [`connection`]: Reading from and writing to transports
//! - [`handler`]: Request handler traits and utilities
//!
//! # Error Handling
//!
//! - [`protocol::ParseError`]: malformed requests, truncated streams and read failures
//! - [`protocol::SendError`]: writer operations in the wrong order and write failures
//! - [`protocol::HttpError`]: Top-level error type
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request per connection
//! - No obsolete header line folding
//! - Request bodies are only framed by `Content-Length`
//! - No TLS support

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
