//! Core HTTP protocol types.
//!
//! This module holds the data model shared by the decoder and the writer. It
//! performs no I/O.
//!
//! # Components
//!
//! - **Headers** ([`header_map`]): [`HeaderMap`], case-insensitive storage with
//!   the `", "` merge rule for repeated names
//! - **Requests** ([`request`]): [`RequestLine`] and the finished [`Request`]
//! - **Status lines** ([`status`]): [`StatusCode`] and the extendable
//!   [`StatusRegistry`] of reason phrases
//! - **States** ([`state`]): [`ParserState`] and [`WriterState`], both of which
//!   only move forward
//! - **Errors** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response writing errors

pub mod header_map;
pub use header_map::HeaderMap;

mod request;
pub use request::HTTP_VERSION;
pub use request::Request;
pub use request::RequestLine;

mod status;
pub use status::StatusCode;
pub use status::StatusRegistry;

mod state;
pub use state::ParserState;
pub use state::WriterState;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
