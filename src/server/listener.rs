use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::http::connection::Connection;
use crate::server::handler::Handler;

/// Lifecycle of a [`Server`]. The only transition is `Listening -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Listening,
    Closed,
}

/// Handle to a running server.
///
/// The accept loop runs on a background task and spawns one task per
/// connection. Closing the server only stops accepting; connections already
/// accepted run to completion. Dropping the handle closes the server.
pub struct Server {
    state: watch::Sender<ServerState>,
    local_addr: SocketAddr,
    accept_task: Option<JoinHandle<()>>,
}

impl Server {
    /// Listens on `port` on all interfaces.
    pub async fn serve<H: Handler>(port: u16, handler: H) -> anyhow::Result<Self> {
        Self::bind(("0.0.0.0", port), handler).await
    }

    pub async fn bind<A, H>(addr: A, handler: H) -> anyhow::Result<Self>
    where
        A: ToSocketAddrs,
        H: Handler,
    {
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind listener")?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let (state, state_rx) = watch::channel(ServerState::Listening);
        let accept_task = tokio::spawn(accept_loop(listener, Arc::new(handler), state_rx));

        Ok(Self {
            state,
            local_addr,
            accept_task: Some(accept_task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Stops accepting connections. Safe to call more than once.
    ///
    /// Only the state changes here; the listening socket is dropped by the
    /// accept loop shortly after, so a connect may still complete in between.
    /// Use [`Server::shutdown`] when the port has to be released on return.
    pub fn close(&self) {
        let closed = self.state.send_if_modified(|state| {
            if *state == ServerState::Listening {
                *state = ServerState::Closed;
                true
            } else {
                false
            }
        });
        if closed {
            info!(addr = %self.local_addr, "server closed");
        }
    }

    /// Closes the server and waits for the accept loop to release the
    /// listening socket.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "accept loop terminated abnormally");
            }
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close();
    }
}

enum Event {
    Accepted(std::io::Result<(TcpStream, SocketAddr)>),
    StateChanged { sender_alive: bool },
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    mut state: watch::Receiver<ServerState>,
) {
    loop {
        let event = tokio::select! {
            res = listener.accept() => Event::Accepted(res),
            res = state.changed() => Event::StateChanged { sender_alive: res.is_ok() },
        };
        let closed = *state.borrow() == ServerState::Closed;

        match event {
            Event::Accepted(Ok((socket, peer))) => {
                if closed {
                    break;
                }
                debug!(%peer, "accepted connection");
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    Connection::new(socket, peer).run(handler.as_ref()).await;
                });
            }
            Event::Accepted(Err(e)) => {
                if closed {
                    break;
                }
                error!(error = %e, "error accepting connection");
            }
            Event::StateChanged { sender_alive } => {
                if closed || !sender_alive {
                    break;
                }
            }
        }
    }

    // Dropping the listener releases the socket.
    drop(listener);
    debug!("accept loop stopped");
}
