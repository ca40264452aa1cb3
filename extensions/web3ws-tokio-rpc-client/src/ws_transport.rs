use futures_util::{SinkExt, StreamExt};
use std::sync::Mutex;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};
use web3ws::utils::lock_ignore_poison;
use web3ws_rpc_service_caller::{RpcTransport, TransportError, TransportEvent, TransportEventSender};

/// WebSocket transport built on `tokio-tungstenite`.
///
/// Requests go out as text frames. Inbound text and binary frames are both
/// forwarded as messages; ping/pong is answered by tungstenite itself.
pub struct WsTransport {
    url: String,
    tx: Mutex<Option<UnboundedSender<WsMessage>>>,
    send_task: Mutex<Option<JoinHandle<()>>>,
    recv_task: Mutex<Option<JoinHandle<()>>>,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tx: Mutex::new(None),
            send_task: Mutex::new(None),
            recv_task: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl RpcTransport for WsTransport {
    async fn connect(&self, events: TransportEventSender) -> Result<(), TransportError> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;

        tracing::info!("WebSocket connected to {}", self.url);

        let (mut sender, mut receiver) = ws_stream.split();
        let (tx, mut rx) = unbounded_channel::<WsMessage>();

        // Send loop
        let write_events = events.clone();
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let is_close = matches!(msg, WsMessage::Close(_));

                if let Err(err) = sender.send(msg).await {
                    // A failed close means the session is already gone.
                    if !is_close {
                        tracing::warn!("WebSocket write failed: {}", err);
                        let _ = write_events
                            .unbounded_send(TransportEvent::Disconnected(Some(err.to_string())));
                    }
                    break;
                }

                if is_close {
                    break;
                }
            }

            // Dropping `rx` here makes later `send()` calls fail immediately.
            let _ = sender.close().await;
        });

        // Receive loop
        let recv_task = tokio::spawn(async move {
            let reason = loop {
                match receiver.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        let _ = events.unbounded_send(TransportEvent::Message(
                            text.as_str().as_bytes().to_vec(),
                        ));
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        let _ = events.unbounded_send(TransportEvent::Message(bytes.to_vec()));
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        break frame.map(|frame| frame.reason.as_str().to_owned());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => break Some(err.to_string()),
                    None => break None,
                }
            };

            let _ = events.unbounded_send(TransportEvent::Disconnected(reason));
        });

        *lock_ignore_poison(&self.tx) = Some(tx);

        if let Some(stale) = lock_ignore_poison(&self.send_task).replace(send_task) {
            stale.abort();
        }

        if let Some(stale) = lock_ignore_poison(&self.recv_task).replace(recv_task) {
            stale.abort();
        }

        Ok(())
    }

    fn send(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        let text =
            String::from_utf8(bytes).map_err(|err| TransportError::SendFailed(err.to_string()))?;

        match lock_ignore_poison(&self.tx).as_ref() {
            Some(tx) => tx
                .send(WsMessage::Text(text.into()))
                .map_err(|_| TransportError::SendFailed("WebSocket writer has stopped".into())),
            None => Err(TransportError::NotConnected),
        }
    }

    fn drop_session(&self, reason: &str) {
        let Some(tx) = lock_ignore_poison(&self.tx).take() else {
            return;
        };

        tracing::info!("Dropping WebSocket session to {}: {}", self.url, reason);

        // The client already knows; the receive loop must not report it again.
        if let Some(recv_task) = lock_ignore_poison(&self.recv_task).take() {
            recv_task.abort();
        }

        // The send loop exits on its own once the close frame is written.
        let _ = tx.send(WsMessage::Close(None));
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        for task in [&self.send_task, &self.recv_task] {
            if let Some(handle) = lock_ignore_poison(task).take() {
                handle.abort();
            }
        }
    }
}
