// src/server/mod.rs

//! The TCP accept loop: binds the listener, spawns a `ConnectionHandler` per
//! client, and fans out the shutdown signal.

use crate::connection::ConnectionHandler;
use crate::core::ZirconError;
use crate::core::state::ServerState;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Runs the server until ctrl-c.
pub async fn run(state: Arc<ServerState>) -> Result<(), ZirconError> {
    let (host, port, max_clients) = {
        let config = state.config.lock().await;
        (config.host.clone(), config.port, config.max_clients)
    };
    let listener = TcpListener::bind((host.as_str(), port)).await?;
    info!("ZirconDB listening on {host}:{port}");

    let next_session_id = AtomicU64::new(1);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, closing connections.");
                let _ = state.shutdown_tx.send(());
                break;
            }
            accepted = listener.accept() => {
                let (socket, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to accept connection: {e}");
                        continue;
                    }
                };
                if state.clients.len() >= max_clients {
                    warn!("Rejecting connection from {addr}: max clients reached");
                    continue;
                }
                let session_id = next_session_id.fetch_add(1, Ordering::Relaxed);
                let state = state.clone();
                let shutdown_rx = state.shutdown_tx.subscribe();
                tokio::spawn(async move {
                    let mut handler =
                        ConnectionHandler::new(socket, addr, state, session_id, shutdown_rx);
                    if let Err(e) = handler.run().await {
                        warn!("Connection {addr} terminated with error: {e}");
                    }
                });
            }
        }
    }
    Ok(())
}
