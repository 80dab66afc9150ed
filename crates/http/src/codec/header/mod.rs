//! HTTP header processing module for encoding and decoding header sections
//!
//! # Components
//!
//! - Header decoding: [`HeaderMap::parse`](crate::protocol::HeaderMap::parse)
//!   consumes one header line per call and reports the end of the section
//! - [`HeaderEncoder`]: writes status lines and `name: value` sections, used
//!   for both headers and trailers

mod header_decoder;
mod header_encoder;

pub use header_encoder::HeaderEncoder;
