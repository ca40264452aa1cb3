use std::time::Duration;
use thiserror::Error;
use web3ws::rpc::RpcCallError;
use web3ws_rpc_service_caller::TransportError;

/// Failures of a connection attempt.
#[derive(Error, Debug)]
pub enum RpcClientError {
    /// The transport session could not be opened.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No handshake response arrived within the configured budget. The session
    /// has been dropped; connect again to retry.
    #[error("connection handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// The handshake call failed outright. The session has been dropped.
    #[error("connection handshake rejected: {0}")]
    HandshakeRejected(#[source] RpcCallError),

    #[error("client is already connected or connecting")]
    AlreadyConnected,
}
