//! Request handlers.
//!
//! A handler receives the parsed [`Request`] together with a fresh
//! [`ResponseWriter`] and drives the writer itself. Returning a
//! [`HandlerError`] before anything was written lets the connection answer
//! with the error's status instead.

use std::io::Write;

use thiserror::Error;

use crate::connection::ResponseWriter;
use crate::protocol::{Request, SendError, StatusCode};

pub trait Handler<W: Write> {
    fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<W, F> Handler<W> for HandlerFn<F>
where
    W: Write,
    F: Fn(&mut ResponseWriter<W>, &Request) -> Result<(), HandlerError>,
{
    fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError> {
        (self.f)(writer, request)
    }
}

/// Wraps a function or closure taking the writer and the request as a [`Handler`].
pub fn make_handler<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

/// A failed request with the status and message to report to the client.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    pub fn new<S: ToString>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.to_string() }
    }

    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        Self::internal(e)
    }
}
