//! Connection server: accept loop, per-connection tasks and the handler
//! boundary to application code.

pub mod handler;
pub mod listener;

pub use handler::{Handler, HandlerError, write_error_response};
pub use listener::{Server, ServerState};
