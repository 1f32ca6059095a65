use std::fmt;

use crate::http::headers::HeaderMap;

/// HTTP status code written on the status line.
///
/// Only the codes this server produces carry a reason phrase:
/// - `OK` (200)
/// - `BAD_REQUEST` (400)
/// - `INTERNAL_SERVER_ERROR` (500)
///
/// Any other code can still be written; its reason phrase is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode(404).as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::BAD_REQUEST.reason_phrase(), "Bad Request");
    /// assert_eq!(StatusCode(404).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            500 => "Internal Server Error",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Headers every plain (non-chunked) response carries.
///
/// The connection is always closed after one response, which is announced
/// with `Connection: close`.
pub fn default_headers(content_length: usize, content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.set("Content-Length", &content_length.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", content_type);
    headers
}
