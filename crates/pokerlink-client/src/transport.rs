//! WebSocket transport for the session runtime.
//!
//! Provides [`WsTransport`], the production [`Driver`]. Each socket runs in
//! its own task and reports back through one shared channel. This is a thin
//! layer that just moves text frames; connection policy remains in the
//! Sans-IO connection manager.

use std::{collections::HashMap, future::Future};

use futures_util::{SinkExt, StreamExt};
use pokerlink_app::{Driver, TransportEvent};
use pokerlink_core::SocketId;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{
    Message,
    protocol::{CloseFrame, frame::coding::CloseCode},
};

use crate::TransportError;

/// Close code reported when a socket drops without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Close code reported when the peer sent a close frame without a code.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// Capacity of the shared event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

enum Outbound {
    Text(String),
    Close(u16, String),
}

struct SocketHandle {
    outbound: mpsc::UnboundedSender<Outbound>,
    abort_handle: tokio::task::AbortHandle,
}

/// WebSocket driver backed by tokio-tungstenite.
pub struct WsTransport {
    events_tx: mpsc::Sender<TransportEvent>,
    events_rx: mpsc::Receiver<TransportEvent>,
    sockets: HashMap<SocketId, SocketHandle>,
}

impl WsTransport {
    /// Create a transport with no sockets.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self { events_tx, events_rx, sockets: HashMap::new() }
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        for handle in self.sockets.values() {
            handle.abort_handle.abort();
        }
    }
}

impl Driver for WsTransport {
    type Error = TransportError;

    async fn next_event(&mut self) -> Option<TransportEvent> {
        let event = self.events_rx.recv().await;
        if let Some(TransportEvent::Closed(socket, _)) = &event {
            self.sockets.remove(socket);
        }
        event
    }

    fn open(
        &mut self,
        socket: SocketId,
        url: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let events = self.events_tx.clone();
        let task = tokio::spawn(run_socket(socket, url.to_string(), outbound_rx, events));

        let handle = SocketHandle { outbound: outbound_tx, abort_handle: task.abort_handle() };
        self.sockets.insert(socket, handle);
        std::future::ready(Ok(()))
    }

    fn send_text(
        &mut self,
        socket: SocketId,
        text: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        match self.sockets.get(&socket) {
            Some(handle) => {
                // A send failure means the task already ended; its Closed
                // event is on the way.
                let _ = handle.outbound.send(Outbound::Text(text));
            },
            None => tracing::debug!(socket, "send on unknown socket"),
        }
        std::future::ready(Ok(()))
    }

    fn close(
        &mut self,
        socket: SocketId,
        code: u16,
        reason: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        if let Some(handle) = self.sockets.remove(&socket) {
            let _ = handle.outbound.send(Outbound::Close(code, reason));
        }
        std::future::ready(Ok(()))
    }
}

/// Run one socket until it closes, reporting every event.
///
/// Always ends with exactly one `Closed` event.
async fn run_socket(
    socket: SocketId,
    url: String,
    outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::Sender<TransportEvent>,
) {
    let code = match pump(socket, &url, outbound, &events).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(socket, error = %e, "socket failed");
            let _ = events.send(TransportEvent::Error(socket, e.to_string())).await;
            CLOSE_ABNORMAL
        },
    };

    let _ = events.send(TransportEvent::Closed(socket, code)).await;
}

/// Connect and move frames until either side closes. Returns the close code.
async fn pump(
    socket: SocketId,
    url: &str,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: &mpsc::Sender<TransportEvent>,
) -> Result<u16, TransportError> {
    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    let _ = events.send(TransportEvent::Opened(socket)).await;
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let event = TransportEvent::Text(socket, text.as_str().to_owned());
                    let _ = events.send(event).await;
                },
                Some(Ok(Message::Close(frame))) => {
                    // Flushes the close reply tungstenite queued for the peer.
                    let _ = write.close().await;
                    return Ok(frame.map_or(CLOSE_NO_STATUS, |f| u16::from(f.code)));
                },
                // Pings are answered by tungstenite; binary frames are not
                // part of the protocol.
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TransportError::Stream(e.to_string())),
                None => return Ok(CLOSE_ABNORMAL),
            },
            command = outbound.recv() => match command {
                Some(Outbound::Text(text)) => write
                    .send(Message::Text(text.into()))
                    .await
                    .map_err(|e| TransportError::Stream(e.to_string()))?,
                Some(Outbound::Close(code, reason)) => {
                    let frame = CloseFrame { code: CloseCode::from(code), reason: reason.into() };
                    // The peer may already be gone; the socket is finished either way.
                    let _ = write.send(Message::Close(Some(frame))).await;
                    return Ok(code);
                },
                None => return Ok(CLOSE_ABNORMAL),
            },
        }
    }
}
