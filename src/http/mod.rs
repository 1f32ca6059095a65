//! HTTP/1.1 message framing.
//!
//! This module parses requests from, and writes responses to, raw byte
//! streams. Exactly one request is served per connection.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header map and header line parsing
//! - **`request`**: request line and request representation
//! - **`parser`**: resumable request state machine and the read loop driving it
//! - **`response`**: status codes and default response headers
//! - **`writer`**: writes status line, headers, bodies, chunks and trailers
//! - **`connection`**: per-connection routine tying parser, handler and writer together
//!
//! # Request State Machine
//!
//! Bytes may arrive split at any point. Each state consumes what it can and
//! waits for more input otherwise:
//!
//! ```text
//!        ┌──────────────────┐
//!        │   Initialized    │ ← Wait for a full request line
//!        └──────┬───────────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingHeaders  │ ← One header line per step
//!        └──────┬───────────┘
//!               │ Blank line
//!               ▼
//!        ┌──────────────────┐
//!        │   ParsingBody    │ ← Wait for Content-Length bytes
//!        └──────┬───────────┘
//!               │ Body complete, or no Content-Length
//!               ▼
//!        ┌──────────────────┐
//!        │       Done       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rawhttp::http::parser::read_request;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:42069").await?;
//!     let (mut socket, _addr) = listener.accept().await?;
//!     let request = read_request(&mut socket).await?;
//!     println!("{} {}", request.method(), request.target());
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub use headers::HeaderMap;
pub use parser::{ParseError, Parsed, read_request};
pub use request::{Request, RequestLine, RequestState};
pub use response::{StatusCode, default_headers};
pub use writer::ResponseWriter;
