use crate::protocol::SendError;
use crate::utils::CRLF;
use bytes::BytesMut;
use std::io::Write;

use tokio_util::codec::Encoder;

/// One piece of a chunked body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// Payload bytes, framed as `<hex-size>\r\n<payload>\r\n`
    Data(&'a [u8]),
    /// The zero-size chunk `0\r\n`; trailers and the final blank line follow separately
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: u64,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false, send_size: 0 }
    }

    /// Total payload bytes framed so far.
    pub fn send_size(&self) -> u64 {
        self.send_size
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl Encoder<Chunk<'_>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Chunk<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            // a zero-size frame would read as the last chunk
            Chunk::Data([]) => Ok(()),
            Chunk::Data(bytes) => {
                write!(helper::Writer(dst), "{:X}\r\n", bytes.len())?;
                dst.reserve(bytes.len() + 2);
                dst.extend_from_slice(bytes);
                dst.extend_from_slice(CRLF);
                self.send_size += bytes.len() as u64;
                Ok(())
            }
            Chunk::Last => {
                self.eof = true;
                dst.extend_from_slice(b"0\r\n");
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
