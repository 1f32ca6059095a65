//! Routes served by the `rawhttp` binary.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tracing::{error, warn};

use crate::config::Config;
use crate::http::headers::HeaderMap;
use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::ResponseWriter;
use crate::proxy::Upstream;
use crate::server::Handler;

const PROXY_PREFIX: &str = "/httpbin";

const OK_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const INTERNAL_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

/// Demo application: static pages, a video file and a chunked upstream
/// stream with trailers.
#[derive(Debug, Clone)]
pub struct DemoHandler {
    video_path: PathBuf,
    upstream: String,
}

impl DemoHandler {
    pub fn new(cfg: &Config) -> Self {
        Self {
            video_path: cfg.video_path.clone(),
            upstream: cfg.upstream.clone(),
        }
    }
}

impl Handler for DemoHandler {
    async fn handle<W>(&self, w: &mut ResponseWriter<W>, req: Request)
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = req.target();

        if let Some(route) = target.strip_prefix(PROXY_PREFIX) {
            return self.proxy(w, route).await;
        }

        match target {
            "/video" => self.video(w).await,
            "/yourproblem" => html(w, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            "/myproblem" => html(w, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await,
            _ => html(w, StatusCode::OK, OK_PAGE).await,
        }
    }
}

impl DemoHandler {
    async fn video<W>(&self, w: &mut ResponseWriter<W>)
    where
        W: AsyncWrite + Unpin + Send,
    {
        let video = match tokio::fs::read(&self.video_path).await {
            Ok(video) => video,
            Err(e) => {
                warn!(path = %self.video_path.display(), error = %e, "failed to read video");
                return html(w, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await;
            }
        };

        send(w, StatusCode::OK, "video/mp4", &video).await;
    }

    async fn proxy<W>(&self, w: &mut ResponseWriter<W>, route: &str)
    where
        W: AsyncWrite + Unpin + Send,
    {
        let opened = match Upstream::new(&self.upstream) {
            Ok(upstream) => upstream.open(route).await,
            Err(e) => Err(e),
        };
        let mut body = match opened {
            Ok(body) => body,
            Err(e) => {
                error!(route, error = %e, "upstream request failed");
                return send(w, StatusCode::INTERNAL_SERVER_ERROR, "text/plain", b"").await;
            }
        };

        let mut headers = HeaderMap::new();
        headers.set("Content-Type", "text/plain");
        headers.set("Transfer-Encoding", "chunked");
        headers.set("Trailer", "x-content-sha256, x-content-length");
        if let Err(e) = write_head(w, StatusCode::OK, &headers).await {
            error!(error = %e, "error writing response head");
            return;
        }

        let mut hasher = Sha256::new();
        let mut total = 0usize;
        loop {
            match body.next_chunk().await {
                Ok(Some(chunk)) => {
                    hasher.update(&chunk);
                    if let Err(e) = w.write_chunked_body(&chunk).await {
                        error!(error = %e, "error writing chunked body");
                        break;
                    }
                    total += chunk.len();
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "error reading from upstream");
                    break;
                }
            }
        }

        if let Err(e) = w.write_chunked_body_done().await {
            error!(error = %e, "error writing chunked body done");
        }

        let mut trailers = HeaderMap::new();
        trailers.set("x-content-sha256", &format!("{:x}", hasher.finalize()));
        trailers.set("x-content-length", &total.to_string());
        if let Err(e) = w.write_trailers(&trailers).await {
            error!(error = %e, "error writing trailers");
        }
    }
}

async fn html<W>(w: &mut ResponseWriter<W>, status: StatusCode, page: &str)
where
    W: AsyncWrite + Unpin + Send,
{
    send(w, status, "text/html", page.as_bytes()).await
}

/// Writes a complete response with default headers, logging the first
/// write error.
async fn send<W>(w: &mut ResponseWriter<W>, status: StatusCode, content_type: &str, body: &[u8])
where
    W: AsyncWrite + Unpin + Send,
{
    let headers = default_headers(body.len(), content_type);
    let result = match write_head(w, status, &headers).await {
        Ok(()) => w.write_body(body).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!(status = status.as_u16(), error = %e, "error writing response");
    }
}

async fn write_head<W>(
    w: &mut ResponseWriter<W>,
    status: StatusCode,
    headers: &HeaderMap,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    w.write_status_line(status).await?;
    w.write_headers(headers).await
}
