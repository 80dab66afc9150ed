//! Async demo server: one tokio task per connection, one request per connection.
//!
//! ```text
//! curl -v http://127.0.0.1:42069/
//! curl -v http://127.0.0.1:42069/yourproblem
//! curl -v http://127.0.0.1:42069/myproblem
//! curl -v --raw http://127.0.0.1:42069/chunked
//! ```

use std::sync::Arc;

use micro_h1::connection::{ResponseWriter, default_headers, read_request};
use micro_h1::handler::{Handler, HandlerError, make_handler};
use micro_h1::protocol::{HeaderMap, Request, StatusCode};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

const BAD_REQUEST_HTML: &str = r#"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>"#;

const INTERNAL_ERROR_HTML: &str = r#"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>"#;

const SUCCESS_HTML: &str = r#"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>"#;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let listener = match TcpListener::bind(("127.0.0.1", PORT)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };
    info!(port = PORT, "start listening");

    let handler = Arc::new(make_handler(route));

    loop {
        let (stream, _remote_addr) = match listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            match serve(stream, handler.as_ref()).await {
                Ok(()) => info!("finished process, connection shutdown"),
                Err(e) => error!("service has error, cause {}, connection shutdown", e),
            }
        });
    }
}

/// Reads one request, renders the response into memory, then sends it.
async fn serve<H: Handler<Vec<u8>>>(mut stream: TcpStream, handler: &H) -> std::io::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut response = ResponseWriter::new(Vec::new());

    match read_request(reader).await {
        Ok(request) => {
            info!(method = request.method(), target = request.target(), "received request");
            if let Err(e) = handler.call(&mut response, &request) {
                error!(cause = %e, "handler failed");
                if response.is_initialized() {
                    plain(&mut response, e.status(), e.message()).map_err(std::io::Error::other)?;
                }
            }
        }
        Err(e) => {
            warn!(cause = %e, "rejecting malformed request");
            plain(&mut response, StatusCode::BAD_REQUEST, "Bad Request\n").map_err(std::io::Error::other)?;
        }
    }

    writer.write_all(&response.into_inner()).await?;
    writer.shutdown().await
}

fn plain(writer: &mut ResponseWriter<Vec<u8>>, status: StatusCode, body: &str) -> Result<(), HandlerError> {
    writer.write_status_line(status)?;
    writer.write_headers(&default_headers(body.len()))?;
    writer.write_body(body.as_bytes())?;
    Ok(())
}

fn route(writer: &mut ResponseWriter<Vec<u8>>, request: &Request) -> Result<(), HandlerError> {
    match request.target() {
        "/yourproblem" => html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_HTML),
        "/myproblem" => html(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_HTML),
        "/chunked" => chunked(writer),
        _ => html(writer, StatusCode::OK, SUCCESS_HTML),
    }
}

fn html(writer: &mut ResponseWriter<Vec<u8>>, status: StatusCode, body: &str) -> Result<(), HandlerError> {
    let mut headers = HeaderMap::new();
    headers.set("content-type", mime::TEXT_HTML.as_ref());
    headers.set("content-length", body.len().to_string());
    headers.set("connection", "close");

    writer.write_status_line(status)?;
    writer.write_headers(&headers)?;
    writer.write_body(body.as_bytes())?;
    Ok(())
}

fn chunked(writer: &mut ResponseWriter<Vec<u8>>) -> Result<(), HandlerError> {
    let mut headers = HeaderMap::new();
    headers.set("content-type", mime::TEXT_PLAIN.as_ref());
    headers.set("transfer-encoding", "chunked");
    headers.set("trailer", "x-content-length");
    headers.set("connection", "close");

    writer.write_status_line(StatusCode::OK)?;
    writer.write_headers(&headers)?;

    let mut total = 0;
    for line in SUCCESS_HTML.lines() {
        total += writer.write_chunked_body(line.as_bytes())?;
        total += writer.write_chunked_body(b"\n")?;
    }
    writer.write_chunked_body_done()?;

    writer.write_trailers([("x-content-length", total.to_string())])?;
    Ok(())
}
