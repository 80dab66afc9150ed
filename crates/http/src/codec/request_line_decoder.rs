//! Request-line decoder.
//!
//! Parses `METHOD SP TARGET SP HTTP/1.1 CRLF` from the front of a buffer. The
//! target is kept opaque; only the method casing and the version are checked.
//! Target bytes that are not UTF-8 are replaced rather than rejected.

use tracing::trace;

use crate::ensure;
use crate::protocol::{HTTP_VERSION, ParseError, RequestLine};
use crate::utils::{CRLF, find_crlf};

const HTTP_NAME: &str = "HTTP";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLineDecoder;

impl RequestLineDecoder {
    /// Attempts to decode the request-line at the start of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((line, consumed)))` once a full line is available, `consumed`
    ///   including the terminator
    /// - `Ok(None)` if no `\r\n` has arrived yet
    /// - `Err(ParseError)` if the line is malformed
    pub fn decode(&self, src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
        let Some(idx) = find_crlf(src) else {
            return Ok(None);
        };

        // method and version must be ASCII anyway, the target is opaque
        let line = String::from_utf8_lossy(&src[..idx]);
        let request_line = parse_request_line(&line)?;

        trace!(method = request_line.method(), target = request_line.target(), "parsed request-line");
        Ok(Some((request_line, idx + CRLF.len())))
    }
}

fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::invalid_request_line(line));
    };

    ensure!(!method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::invalid_method(method));

    let Some((name, number)) = version.split_once('/') else {
        return Err(ParseError::invalid_version(version));
    };
    ensure!(name == HTTP_NAME, ParseError::invalid_version(name));
    ensure!(number == HTTP_VERSION, ParseError::invalid_version(number));

    Ok(RequestLine::new(method.to_owned(), target.to_owned(), number.to_owned()))
}
