//! HTTP body handling module for request and response payloads
//!
//! # Components
//!
//! - [`LengthDecoder`]: accumulates a request body framed by `content-length`
//! - [`ChunkedEncoder`]: frames a response body with chunked transfer encoding
//!
//! Request bodies are only ever framed by `content-length`; chunked request
//! bodies are not decoded.

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::Chunk;
pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::LengthDecoder;
