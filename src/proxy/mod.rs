//! Upstream proxying
//!
//! Streams responses from an upstream HTTP server; used by the `/httpbin`
//! route to produce chunked responses with trailers.

pub mod upstream;

pub use upstream::{Upstream, UpstreamBody};
