#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Reader that hands out at most `chunk_size` bytes per read.
pub struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
}

impl ChunkReader {
    pub fn new(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0);
        Self {
            data: data.into(),
            pos: 0,
            chunk_size,
        }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let remaining = self.data.len() - self.pos;
        let n = remaining.min(self.chunk_size).min(buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..start + n]);
        self.pos += n;
        Poll::Ready(Ok(()))
    }
}

/// Decodes a chunked body up to and including the `0\r\n` terminator.
///
/// Returns the payload and the bytes that follow the terminator.
pub fn decode_chunked(mut data: &[u8]) -> (Vec<u8>, &[u8]) {
    let mut payload = Vec::new();
    loop {
        let line_end = data
            .windows(2)
            .position(|w| w == b"\r\n")
            .expect("chunk size line");
        let size_str = std::str::from_utf8(&data[..line_end]).expect("utf-8 chunk size");
        let size = usize::from_str_radix(size_str, 16).expect("hex chunk size");
        data = &data[line_end + 2..];

        if size == 0 {
            return (payload, data);
        }

        payload.extend_from_slice(&data[..size]);
        assert_eq!(&data[size..size + 2], b"\r\n", "chunk data must end with CRLF");
        data = &data[size + 2..];
    }
}

/// Splits a serialized header block into its lines, without the blank
/// terminator. Panics if the block is not terminated.
pub fn header_lines(block: &str) -> Vec<&str> {
    let body = block.strip_suffix("\r\n\r\n").expect("terminated header block");
    body.split("\r\n").collect()
}
