//! HTTP header encoder implementation for serializing response heads
//!
//! This module turns a status code and a set of fields into raw bytes. The
//! same field encoding serves both the header section and the trailer section
//! that follows a chunked body.

use bytes::{BufMut, BytesMut};
use std::io;
use std::io::Write;

use crate::protocol::StatusCode;
use crate::utils::CRLF;

/// Initial buffer size reserved for a header block
const INIT_HEADER_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl HeaderEncoder {
    /// Encodes `HTTP/1.1 <code> <reason>\r\n`.
    pub fn encode_status_line(&self, code: StatusCode, reason: &str, dst: &mut BytesMut) -> io::Result<()> {
        dst.reserve(16 + reason.len());
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", code.as_str(), reason)
    }

    /// Encodes one `<name>: <value>\r\n` line per field, then the blank line
    /// closing the section.
    pub fn encode_fields<I, K, V>(&self, fields: I, dst: &mut BytesMut)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        dst.reserve(INIT_HEADER_SIZE);
        for (name, value) in fields {
            dst.put_slice(name.as_ref().as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_ref().as_bytes());
            dst.put_slice(CRLF);
        }
        dst.put_slice(CRLF);
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Avoids going through an intermediate `String` when formatting into the
/// bytes buffer, since enough space has already been reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::HeaderMap;

    #[test]
    fn status_line() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode_status_line(StatusCode::BAD_REQUEST, "Bad Request", &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.1 400 Bad Request\r\n");
    }

    #[test]
    fn status_line_without_reason() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode_status_line(StatusCode::from_u16(599).unwrap(), "", &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.1 599 \r\n");
    }

    #[test]
    fn fields_from_map() {
        let mut headers = HeaderMap::new();
        headers.set("Content-Length", "5");

        let mut dst = BytesMut::new();
        HeaderEncoder.encode_fields(&headers, &mut dst);

        assert_eq!(&dst[..], b"content-length: 5\r\n\r\n");
    }

    #[test]
    fn fields_keep_caller_spelling() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode_fields([("X-Content-Length", "10"), ("X-Trace", "abc")], &mut dst);

        assert_eq!(&dst[..], b"X-Content-Length: 10\r\nX-Trace: abc\r\n\r\n");
    }

    #[test]
    fn empty_section_is_blank_line() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode_fields(&HeaderMap::new(), &mut dst);

        assert_eq!(&dst[..], b"\r\n");
    }
}
