//! HTTP header decoder implementation for parsing request header lines
//!
//! Header lines are decoded one at a time from the front of the unconsumed
//! buffer and folded into a [`HeaderMap`]. The header section ends with a bare
//! `\r\n`.
//!
//! # Rules
//!
//! - No whitespace is allowed between the field name and the colon
//! - Names are trimmed and lower-cased, values are trimmed
//! - Values are opaque; bytes that are not UTF-8 are replaced, never rejected
//! - Names may only contain ASCII letters, digits and ``!#$%&'*+-.^_`|~``
//! - A repeated name appends `", " + value` to the stored value
//! - Obsolete line folding is not supported

use tracing::trace;

use crate::ensure;
use crate::protocol::{HeaderMap, ParseError};
use crate::utils::{CRLF, find_crlf};

const NAME_SPECIALS: &[u8] = b"!#$%&'*+-.^_`|~";

impl HeaderMap {
    /// Attempts to decode one header line from the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok((0, false))` if no complete line is available yet
    /// - `Ok((2, true))` if `src` starts with the blank line ending the section
    /// - `Ok((n, false))` after storing one field, `n` including the terminator
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidHeader` if:
    /// - The line has no colon
    /// - There is whitespace between the name and the colon
    /// - The name is empty or contains characters outside the token set
    pub fn parse(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(idx) = find_crlf(src) else {
            return Ok((0, false));
        };

        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &src[..idx];

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Err(ParseError::invalid_header(format!("malformed header: {}", String::from_utf8_lossy(line))));
        };
        let (raw_name, raw_value) = (&line[..colon], &line[colon + 1..]);

        ensure!(
            !raw_name.ends_with(b" ") && !raw_name.ends_with(b"\t"),
            ParseError::invalid_header(format!("whitespace between header name and colon: {}", String::from_utf8_lossy(line)))
        );

        let name = raw_name.trim_ascii_start();
        ensure!(!name.is_empty(), ParseError::invalid_header("empty header name"));
        ensure!(
            name.iter().copied().all(is_name_byte),
            ParseError::invalid_header(format!("invalid character in header name: {}", String::from_utf8_lossy(name)))
        );

        // the name is ASCII by now, values are opaque octets
        let name = String::from_utf8_lossy(name);
        let value = String::from_utf8_lossy(raw_value.trim_ascii());
        trace!(name = &*name, value = &*value, "parsed header line");
        self.append(&name, value);

        Ok((idx + CRLF.len(), false))
    }
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || NAME_SPECIALS.contains(&b)
}
