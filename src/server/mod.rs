// TCP command server.
//
// Accepts connections and answers prefix-framed commands (see `protocol`)
// from the single shared Classifier. Every connection gets its own task;
// they all go through the same `Arc<Classifier>`, whose lock serializes
// theme mutations.

pub mod protocol;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use protocol::{frame_reply, parse_command, Command, READY_REPLY};

/// Largest request accepted in a single read.
pub const MAX_FRAME: usize = 32_000;

/// Bind `addr` and serve until the process exits.
pub async fn serve(addr: &str, classifier: Arc<Classifier>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr, "Server started, waiting for client requests");

    loop {
        let (socket, peer) = listener.accept().await.context("Failed to accept connection")?;
        info!(%peer, "New connection");
        let classifier = Arc::clone(&classifier);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, &classifier).await {
                warn!(%peer, error = %e, "Connection closed with error");
            }
            debug!(%peer, "Connection finished");
        });
    }
}

/// Answer requests on one connection until the client hangs up.
pub async fn handle_connection(mut socket: TcpStream, classifier: &Classifier) -> Result<()> {
    let mut buf = vec![0u8; MAX_FRAME];
    loop {
        let n = socket.read(&mut buf).await.context("Read failed")?;
        if n == 0 {
            return Ok(());
        }

        let reply = respond(parse_command(&buf[..n]), classifier).await;
        socket
            .write_all(reply.as_bytes())
            .await
            .context("Write failed")?;
    }
}

/// Run one command against the classifier and frame the answer.
pub async fn respond(command: Command, classifier: &Classifier) -> String {
    let message = match command {
        Command::CheckHealth => return READY_REPLY.to_string(),
        Command::Add(theme) => classifier.add_theme(&theme).await,
        Command::Remove(theme) => classifier.remove_theme(&theme).await,
        Command::List => classifier.list_themes().await,
        Command::Text(text) => classifier.classify(&text).await,
        Command::Unknown => "Неизвестная команда".to_string(),
    };
    frame_reply(&message)
}
