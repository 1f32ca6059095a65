//! rawhttp - HTTP/1.1 from raw TCP
//!
//! Incremental request parsing and response writing on top of tokio byte
//! streams, plus a small one-request-per-connection server.

pub mod config;
pub mod http;
pub mod proxy;
pub mod routes;
pub mod server;
