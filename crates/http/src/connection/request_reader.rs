use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, ParserState, Request};

const INIT_BUFFER_SIZE: usize = 8 * 1024;

/// Reads one request from an async reader.
///
/// This is the async counterpart of [`parse_message`](super::parse_message):
/// the same decoder and the same end of stream rules, with buffering left to
/// [`FramedRead`]. Bytes following the request are dropped.
pub async fn read_request<R>(reader: R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut framed_read = FramedRead::with_capacity(reader, RequestDecoder::new(), INIT_BUFFER_SIZE);

    match framed_read.next().await {
        Some(result) => result,
        None => Err(ParseError::incomplete(ParserState::Initialized)),
    }
}
