use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::http::headers::find_crlf;
use crate::http::request::{Request, RequestLine, RequestState};

const INITIAL_BUFFER_SIZE: usize = 1024;
const SUPPORTED_VERSION: &str = "1.1";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line: {0}")]
    MalformedRequestLine(&'static str),
    #[error("malformed header: {0:?}")]
    MalformedHeader(String),
    #[error("invalid header token: {0:?}")]
    InvalidHeaderToken(String),
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),
    #[error("incomplete request")]
    IncompleteRequest,
    #[error("parse attempted in done state")]
    InternalState,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of one parsing step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// Nothing consumed; more bytes have to be read first
    NeedMoreInput,
    /// `n` bytes consumed, the current element continues
    Progress(usize),
    /// `n` bytes consumed and the current element is complete
    Terminal(usize),
}

impl Request {
    /// Feeds buffered bytes to the state machine.
    ///
    /// Runs as many steps as the buffered data allows and returns the total
    /// number of bytes consumed. The caller drops those bytes from its buffer
    /// and keeps the rest for the next call.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::InternalState);
        }

        let mut consumed = 0;
        while !self.is_done() {
            match self.parse_single(&data[consumed..])? {
                Parsed::NeedMoreInput => break,
                Parsed::Progress(n) | Parsed::Terminal(n) => consumed += n,
            }
        }
        Ok(consumed)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<Parsed, ParseError> {
        match self.state {
            RequestState::Initialized => {
                let Some(line_end) = find_crlf(data) else {
                    return Ok(Parsed::NeedMoreInput);
                };
                self.request_line = parse_request_line(&data[..line_end])?;
                self.state = RequestState::ParsingHeaders;
                trace!(method = %self.request_line.method, target = %self.request_line.target, "request line parsed");
                Ok(Parsed::Terminal(line_end + 2))
            }

            RequestState::ParsingHeaders => {
                let parsed = self.headers.parse(data)?;
                if let Parsed::Terminal(_) = parsed {
                    self.state = RequestState::ParsingBody;
                }
                Ok(parsed)
            }

            RequestState::ParsingBody => {
                let length = match self.headers.get("content-length") {
                    None | Some("0") => {
                        self.state = RequestState::Done;
                        return Ok(Parsed::Terminal(0));
                    }
                    Some(value) => value
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?,
                };

                if data.len() < length {
                    return Ok(Parsed::NeedMoreInput);
                }
                self.body = data[..length].to_vec();
                self.state = RequestState::Done;
                Ok(Parsed::Terminal(length))
            }

            RequestState::Done => Err(ParseError::InternalState),
        }
    }
}

fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let parts: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine(
            "invalid number of parts in request line",
        ));
    };
    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine("empty part in request line"));
    }
    if !method.iter().all(|b| b.is_ascii_graphic() && !b.is_ascii_lowercase()) {
        return Err(ParseError::MalformedRequestLine("invalid method"));
    }

    let version = match version.strip_prefix(b"HTTP/") {
        Some(v) if !v.contains(&b'/') => v,
        _ => return Err(ParseError::MalformedRequestLine("invalid version format")),
    };
    if version != SUPPORTED_VERSION.as_bytes() {
        return Err(ParseError::MalformedRequestLine("unsupported version"));
    }

    // method and version are ASCII here; the target is opaque
    Ok(RequestLine {
        method: String::from_utf8_lossy(method).into_owned(),
        target: String::from_utf8_lossy(target).into_owned(),
        version: SUPPORTED_VERSION.to_string(),
    })
}

/// Reads one complete request from `reader`.
///
/// The read buffer starts small and doubles whenever it fills up before the
/// request is complete; consumed bytes are discarded after every read.
/// Bytes past the end of the request are left unread or dropped, since only
/// one request is read per connection.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut buffer = BytesMut::with_capacity(INITIAL_BUFFER_SIZE);

    while !request.is_done() {
        if buffer.len() == buffer.capacity() {
            let grow = buffer.capacity().max(INITIAL_BUFFER_SIZE);
            buffer.reserve(grow);
        }

        let n = reader.read_buf(&mut buffer).await?;
        if n == 0 {
            debug!(state = ?request.state(), buffered = buffer.len(), "eof before request was complete");
            return Err(ParseError::IncompleteRequest);
        }

        let consumed = request.parse(&buffer)?;
        buffer.advance(consumed);
    }

    Ok(request)
}
