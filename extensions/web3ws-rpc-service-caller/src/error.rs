use thiserror::Error;

/// Failures reported by an [`RpcTransport`](crate::RpcTransport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The session could not be established.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// No session is open.
    #[error("transport is not connected")]
    NotConnected,

    /// The session is open but refused the outbound message.
    #[error("failed to send: {0}")]
    SendFailed(String),
}
