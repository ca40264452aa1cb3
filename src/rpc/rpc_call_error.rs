use crate::codec::{CodecError, RpcErrorObject};
use thiserror::Error;

/// Reasons a single RPC call can fail.
///
/// These are isolated per call: none of them tears down the connection.
#[derive(Error, Debug)]
pub enum RpcCallError {
    /// The call's deadline elapsed before a response arrived.
    #[error("rpc call timed out")]
    Timeout,

    /// The transport refused the outbound message.
    #[error("transport failed to send the request: {0}")]
    SendFailed(String),

    /// The connection was closed while the call was outstanding.
    #[error("connection closed")]
    ConnectionClosed,

    /// The id is already held by an outstanding call.
    #[error("request id {0} is already outstanding")]
    DuplicateId(u16),

    /// The connection has not completed its handshake, or has been closed.
    #[error("connection is not ready")]
    NotReady,

    /// The remote endpoint answered with a JSON-RPC error object.
    #[error("remote error: {0}")]
    Remote(RpcErrorObject),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
