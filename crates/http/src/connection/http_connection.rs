use std::io::{Read, Write};

use tracing::{error, info, warn};

use crate::connection::{ResponseWriter, default_headers, parse_message};
use crate::handler::Handler;
use crate::protocol::{HttpError, SendError, StatusCode};

const BAD_REQUEST_BODY: &str = "Bad Request\n";

/// One request/response exchange over a blocking transport.
///
/// The connection reads a single request, hands it to the handler and closes.
/// A request that fails to parse is answered with `400 Bad Request`; a handler
/// that fails before writing anything is answered with the status it reported.
///
/// # Type Parameters
///
/// * `R`: The readable half of the transport
/// * `W`: The writable half of the transport
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> HttpConnection<R, W>
where
    R: Read,
    W: Write,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn process<H>(self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = match parse_message(self.reader) {
            Ok(request) => request,
            Err(e) => {
                warn!(cause = %e, "can't parse request, respond bad request");
                let mut writer = ResponseWriter::new(self.writer);
                write_plain(&mut writer, StatusCode::BAD_REQUEST, BAD_REQUEST_BODY)?;
                writer.flush()?;
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.target(), "receive request");

        let mut writer = ResponseWriter::new(self.writer);
        if let Err(e) = handler.call(&mut writer, &request) {
            error!(cause = %e, state = %writer.state(), "handler failed");
            if writer.is_initialized() {
                write_plain(&mut writer, e.status(), e.message())?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

fn write_plain<W: Write>(writer: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), SendError> {
    writer.write_status_line(status)?;
    writer.write_headers(&default_headers(body.len()))?;
    writer.write_body(body.as_bytes())?;
    Ok(())
}
