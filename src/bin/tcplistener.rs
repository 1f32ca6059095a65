//! Prints every request received on the server port, one per connection.

use rawhttp::config::Config;
use rawhttp::http::read_request;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let listener = TcpListener::bind(("0.0.0.0", cfg.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let req = match read_request(&mut socket).await {
            Ok(req) => req,
            Err(e) => {
                error!(%peer, error = %e, "failed to read request");
                continue;
            }
        };

        println!("Request line:");
        println!("- Method: {}", req.request_line.method);
        println!("- Target: {}", req.request_line.target);
        println!("- Version: {}", req.request_line.version);

        println!("Headers:");
        for (name, value) in &req.headers {
            println!("- {}: {}", name, value);
        }

        println!("Body:");
        println!("{}", String::from_utf8_lossy(&req.body));

        println!("connection closed");
    }
}
