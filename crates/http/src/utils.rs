//! Utility macros and functions for the HTTP crate.
//!
//! This module provides helpers that are used internally by the codec
//! implementation.

/// Line terminator used throughout the protocol.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(!name.is_empty(), ParseError::invalid_header("empty header name"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Returns the offset of the first `\r\n` in `bytes`.
#[inline]
pub(crate) fn find_crlf(bytes: &[u8]) -> Option<usize> {
    bytes.windows(CRLF.len()).position(|window| window == CRLF)
}
