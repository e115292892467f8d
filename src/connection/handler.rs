// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use super::session::SessionState;
use crate::core::handler::Router;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::state::ServerState;
use crate::core::{Command, ZirconError};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Manages the full lifecycle of a client connection.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, RespFrameCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    session: SessionState,
}

impl ConnectionHandler {
    /// Creates a new `ConnectionHandler`.
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, RespFrameCodec),
            addr,
            state,
            session_id,
            shutdown_rx,
            session: SessionState::new(),
        }
    }

    /// The main event loop for the connection, handling incoming frames and signals.
    ///
    /// A blocked client suspends here inside `route`, so its read path is not
    /// serviced until the blocking command resolves.
    pub async fn run(&mut self) -> Result<(), ZirconError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    let shutdown_msg = RespFrame::Error("SHUTDOWN Server is shutting down".to_string());
                    let _ = self.framed.send(shutdown_msg).await;
                    break;
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(frame)) => {
                            debug!("Session {}: Received frame: {:?}", self.session_id, frame);
                            if let Err(e) = self.process_frame(frame).await {
                                warn!("Connection error for {}: {}", self.addr, e);
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            warn!("Protocol error for {}: {}", self.addr, e);
                            break;
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Parses and routes a single frame, replying with the result or an error.
    async fn process_frame(&mut self, frame: RespFrame) -> Result<(), ZirconError> {
        let command = match Command::try_from(frame) {
            Ok(command) => command,
            Err(e) => {
                // A malformed command inside a MULTI block poisons the
                // transaction; EXEC will then abort.
                if self.session.in_transaction
                    && let Some(db) = self.state.get_db(self.session.db_index)
                {
                    db.poison_transaction(self.session_id);
                }
                return self.send_error(e).await;
            }
        };

        let mut router = Router::new(self.state.clone(), self.session_id, &mut self.session);
        match router.route(command).await {
            Ok(resp) => self.framed.send(resp.into()).await,
            Err(e) => self.send_error(e).await,
        }
    }

    async fn send_error(&mut self, e: ZirconError) -> Result<(), ZirconError> {
        self.framed
            .send(RespFrame::Error(e.to_resp_string()))
            .await
    }
}
