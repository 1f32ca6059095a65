use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::HeaderMap;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Writes a response straight onto a sink, one protocol unit per call.
///
/// Nothing is buffered and nothing is checked: callers invoke the methods in
/// wire order (status line, headers, then either a body or chunks followed
/// by the terminating chunk and trailers). After any error the response is
/// partially written and the connection should be abandoned.
pub struct ResponseWriter<W> {
    sink: W,
    written: usize,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Total bytes handed to the sink so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> io::Result<()> {
        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.write_raw(line.as_bytes()).await
    }

    /// Writes one `name: value` line per header and the blank line closing
    /// the block.
    pub async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()> {
        self.write_raw(&serialize_fields(headers)).await
    }

    /// Writes `body` verbatim. The caller must have announced a matching
    /// `Content-Length`.
    pub async fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.write_raw(body).await
    }

    /// Writes one chunk: upper-case hex length, CRLF, data, CRLF.
    ///
    /// An empty `data` produces `0\r\n\r\n`, which is still a data frame and
    /// not the terminating chunk.
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> io::Result<()> {
        let mut frame = format!("{:X}\r\n", data.len()).into_bytes();
        frame.reserve(data.len() + 2);
        frame.extend_from_slice(data);
        frame.extend_from_slice(b"\r\n");
        self.write_raw(&frame).await
    }

    /// Writes the terminating chunk `0\r\n`. Trailers follow immediately.
    pub async fn write_chunked_body_done(&mut self) -> io::Result<()> {
        self.write_raw(b"0\r\n").await
    }

    /// Writes trailer fields in header format, ending the chunked message.
    pub async fn write_trailers(&mut self, trailers: &HeaderMap) -> io::Result<()> {
        self.write_headers(trailers).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes).await?;
        self.written += bytes.len();
        Ok(())
    }
}

fn serialize_fields(headers: &HeaderMap) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");
    buf
}
