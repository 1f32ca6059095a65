//! Sends each line typed on stdin as one UDP datagram.

use rawhttp::config::Config;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UdpSocket;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(("localhost", cfg.port)).await?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b">").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                println!("read error: {}", e);
                break;
            }
        };

        if let Err(e) = socket.send(format!("{}\n", line).as_bytes()).await {
            println!("send udp error: {}", e);
        }
    }

    Ok(())
}
