//! Upstream connection and body streaming
//!
//! Opens a plain TCP connection to an upstream HTTP server, issues a GET and
//! hands the response body back piece by piece, as it arrives.

use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use url::{Position, Url};

/// Default buffer size for streaming
const BUFFER_SIZE: usize = 1024;

/// Upstream response heads larger than this are rejected
const MAX_HEAD_SIZE: usize = 64 * 1024;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// An upstream HTTP server addressed by base URL.
#[derive(Debug, Clone)]
pub struct Upstream {
    base: String,
    connect_timeout: Duration,
}

impl Upstream {
    /// Create an upstream from a base URL such as `http://httpbin.org`.
    ///
    /// Only the `http` scheme is supported.
    pub fn new(base: &str) -> Result<Self> {
        let url = Url::parse(base).context("Invalid upstream URL")?;
        if url.scheme() != "http" {
            anyhow::bail!("Unsupported upstream scheme: {}", url.scheme());
        }
        url.host_str().context("Upstream URL missing host")?;

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            connect_timeout: CONNECT_TIMEOUT,
        })
    }

    /// Resolve `route` (path and query) against the base URL.
    pub fn url_for(&self, route: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base, route)).context("Invalid upstream route")
    }

    /// Connect, send `GET route` and skip the response head.
    ///
    /// The request uses HTTP/1.0 with `Connection: close` so the body is
    /// delimited by the upstream closing the connection.
    pub async fn open(&self, route: &str) -> Result<UpstreamBody> {
        let url = self.url_for(route)?;
        let host = url.host_str().context("Upstream URL missing host")?;
        let port = url.port_or_known_default().unwrap_or(80);

        let addr = format!("{}:{}", host, port);
        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .context("Connection timeout")?
            .context("Failed to connect to upstream")?;

        tracing::trace!(%addr, "Connected to upstream");

        stream.write_all(&build_request(&url)).await?;
        stream.flush().await?;

        let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
        loop {
            let n = stream.read_buf(&mut buffer).await?;
            if n == 0 {
                anyhow::bail!("Connection closed before response head received");
            }

            if let Some(head_end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = buffer.split_to(head_end + 4);
                if !head.starts_with(b"HTTP/1.") {
                    anyhow::bail!("Invalid upstream status line");
                }
                return Ok(UpstreamBody {
                    stream,
                    pending: buffer,
                });
            }

            // Prevent unbounded header growth
            if buffer.len() > MAX_HEAD_SIZE {
                anyhow::bail!("Response headers too large");
            }
        }
    }
}

/// Build HTTP request bytes to send upstream
pub fn build_request(url: &Url) -> Vec<u8> {
    let target = &url[Position::BeforePath..];
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nConnection: close\r\n\r\n",
        target, host
    )
    .into_bytes()
}

/// Body of an upstream response, read until the upstream closes.
pub struct UpstreamBody {
    stream: TcpStream,
    pending: BytesMut,
}

impl UpstreamBody {
    /// Next piece of the body, or `None` once the upstream closed.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if !self.pending.is_empty() {
            return Ok(Some(self.pending.split().freeze()));
        }

        let mut buf = BytesMut::with_capacity(BUFFER_SIZE);
        let n = self.stream.read_buf(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.freeze()))
    }
}
