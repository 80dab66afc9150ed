//! HTTP connection handling module
//!
//! This module binds the pure codecs to transports. Reads and writes block on
//! the transport; the decoder and the writer never block on their own.
//!
//! # Components
//!
//! - [`StreamBuffer`] and [`parse_message`]: read one request from a
//!   `std::io::Read`, growing and compacting a single buffer
//! - [`read_request`]: the same over a `tokio::io::AsyncRead`
//! - [`ResponseWriter`]: emits a response onto a `std::io::Write` in strict
//!   protocol order
//! - [`HttpConnection`]: one request/response exchange, answering malformed
//!   requests with `400 Bad Request`
//!
//! Each connection owns its own buffer and writer; none of these types are
//! meant to be shared between threads without external synchronization.

mod http_connection;
mod request_reader;
mod response_writer;
mod stream_buffer;

pub use http_connection::HttpConnection;
pub use request_reader::read_request;
pub use response_writer::{ResponseWriter, default_headers};
pub use stream_buffer::{StreamBuffer, parse_message};
