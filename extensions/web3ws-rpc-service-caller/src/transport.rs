use crate::TransportError;
use futures::channel::mpsc::UnboundedSender;

/// Something that happened on the transport's own execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One complete inbound message.
    Message(Vec<u8>),

    /// The session ended. Carries the reason when one is known.
    Disconnected(Option<String>),
}

pub type TransportEventSender = UnboundedSender<TransportEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcTransportState {
    Connected,
    Disconnected,
}

/// The message-oriented connection an RPC client runs over.
///
/// Implementations own connection lifecycle, framing and any TLS; the RPC
/// layer only needs whole messages in each direction. Inbound traffic and the
/// end of the session are reported through the event channel handed to
/// [`RpcTransport::connect`], never by calling back into the client.
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Opens the session. Must not return until the session can accept
    /// [`RpcTransport::send`] calls.
    async fn connect(&self, events: TransportEventSender) -> Result<(), TransportError>;

    /// Queues one outbound message without waiting for it to be written.
    fn send(&self, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// Force-closes the session. Calling it on a closed session is a no-op.
    fn drop_session(&self, reason: &str);
}
