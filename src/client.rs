//! Connection lifecycle and the sync loop.
//!
//! One WebSocket carries every frame in both directions. Outbound frames
//! queue on an in-process channel and a send pump drains them onto the
//! socket, so producers (heartbeat, session handlers) never block on the
//! transport. All channel setup is best effort once: a failed connection is
//! fatal to this session and reported to the caller, not retried in a loop.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use frames::{Frame, decode_frame, encode_frame};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::heartbeat::Heartbeat;
use crate::session::SceneSession;

/// Connection and transport failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket transport error: {0}")]
    Transport(Box<tokio_tungstenite::tungstenite::Error>),
}

/// Handles for the background tasks serving one session.
///
/// Every task spawned at mount registers here and is aborted at unmount. A
/// handle that outlives its view is a leak that accumulates across repeated
/// open/close cycles, so teardown also runs on drop.
#[derive(Default)]
pub struct Subscriptions {
    handles: Vec<JoinHandle<()>>,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a task for teardown.
    pub fn register(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    /// Abort every registered task. Idempotent.
    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Connect to the scene process and run the sync loop until the stream ends.
///
/// # Errors
///
/// Returns [`ClientError::Connect`] when the socket cannot be established
/// and [`ClientError::Transport`] when it fails mid-stream.
pub async fn run(url: &str, window: &str, tick_interval: Duration) -> Result<(), ClientError> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|error| ClientError::Connect(Box::new(error)))?;
    tracing::info!(url, "connected to scene process");
    let (mut ws_write, mut ws_read) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Frame>();
    let mut subscriptions = Subscriptions::new();

    // Send pump: drain queued outbound frames onto the socket.
    subscriptions.register(tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let bytes = encode_frame(&frame);
            if ws_write.send(Message::Binary(bytes.into())).await.is_err() {
                tracing::warn!("send pump stopped: socket closed");
                break;
            }
        }
    }));

    let heartbeat = Heartbeat::spawn(tx.clone(), tick_interval);

    let mut session = SceneSession::new(window);
    let result = recv_loop(&mut ws_read, &mut session, &tx).await;

    heartbeat.cancel();
    subscriptions.abort_all();
    result
}

/// Process inbound messages until the socket closes.
async fn recv_loop<S>(
    ws_read: &mut S,
    session: &mut SceneSession,
    tx: &mpsc::UnboundedSender<Frame>,
) -> Result<(), ClientError>
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = ws_read.next().await {
        let message = message.map_err(|error| ClientError::Transport(Box::new(error)))?;
        match message {
            Message::Binary(bytes) => match decode_frame(&bytes) {
                Ok(frame) => {
                    tracing::debug!(syscall = %frame.syscall, status = ?frame.status, "frame received");
                    for outbound in session.handle_frame(&frame) {
                        if tx.send(outbound).is_err() {
                            tracing::warn!("outbound channel closed; ending sync loop");
                            return Ok(());
                        }
                    }
                }
                Err(error) => tracing::warn!(%error, "dropping undecodable frame"),
            },
            Message::Close(_) => {
                tracing::info!("scene process closed the connection");
                break;
            }
            _ => {}
        }
    }
    Ok(())
}
