use crate::http::headers::HeaderMap;

/// Progress of a [`Request`] through parsing.
///
/// States are visited in declaration order and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Waiting for the request line
    Initialized,
    /// Request line parsed, reading header lines
    ParsingHeaders,
    /// Header block closed, reading a `Content-Length` body
    ParsingBody,
    /// Request fully assembled
    Done,
}

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Upper-case method token, e.g. `GET`
    pub method: String,
    /// Request target as sent by the client, path and query untouched
    pub target: String,
    /// Protocol version without the `HTTP/` prefix, always `1.1`
    pub version: String,
}

/// A request read from a single connection.
///
/// Built incrementally by [`Request::parse`] as bytes
/// arrive; fields are only meaningful once [`Request::is_done`] is true.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) state: RequestState,
    pub request_line: RequestLine,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new() -> Self {
        Self {
            state: RequestState::Initialized,
            request_line: RequestLine {
                method: String::new(),
                target: String::new(),
                version: String::new(),
            },
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RequestState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
