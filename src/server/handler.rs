use std::future::Future;
use std::io;

use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::ResponseWriter;

/// Application callback invoked once per successfully parsed request.
///
/// The handler owns the whole response: it must write the status line,
/// headers and body itself before returning. If it writes nothing the
/// connection is closed without sending a byte.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        w: &mut ResponseWriter<W>,
        req: Request,
    ) -> impl Future<Output = ()> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

/// A plain-text error response.
#[derive(Debug, Clone)]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: Vec<u8>,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Writes `err` as a complete `text/plain` response.
pub async fn write_error_response<W>(w: &mut ResponseWriter<W>, err: &HandlerError) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    w.write_status_line(err.status).await?;
    w.write_headers(&default_headers(err.message.len(), "text/plain"))
        .await?;
    w.write_body(&err.message).await
}
