use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::parser::read_request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::server::handler::{Handler, HandlerError, write_error_response};

/// One accepted client connection.
///
/// Exactly one request is read and one response written; the stream is
/// shut down and dropped when [`Connection::run`] returns, whatever the
/// outcome.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub async fn run<H: Handler>(mut self, handler: &H) {
        let peer = self.peer;
        let result = read_request(&mut self.stream).await;
        let mut writer = ResponseWriter::new(&mut self.stream);

        match result {
            Ok(request) => {
                debug!(
                    %peer,
                    method = %request.method(),
                    target = %request.target(),
                    "request received"
                );
                handler.handle(&mut writer, request).await;
                if writer.bytes_written() == 0 {
                    warn!(%peer, "handler returned without writing a response");
                }
            }
            Err(e) => {
                debug!(%peer, error = %e, "rejecting malformed request");
                let err = HandlerError::new(
                    StatusCode::BAD_REQUEST,
                    format!("error parsing request: {e}"),
                );
                // best effort, the peer may already be gone
                if let Err(write_err) = write_error_response(&mut writer, &err).await {
                    debug!(%peer, error = %write_err, "failed to write error response");
                }
            }
        }

        debug!(%peer, bytes = writer.bytes_written(), "closing connection");
        drop(writer);
        let _ = self.stream.shutdown().await;
    }
}
