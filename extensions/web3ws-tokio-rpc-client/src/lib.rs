mod error;
pub use error::RpcClientError;
mod rpc_client;
pub use rpc_client::RpcClient;
mod rpc_client_config;
pub use rpc_client_config::RpcClientConfig;
mod ws_transport;
pub use ws_transport::WsTransport;

pub use web3ws_rpc_service_caller::{
    HandshakeState, RpcCall, RpcServiceCallerInterface, RpcTransport, RpcTransportState,
    TransportError, TransportEvent, TransportEventSender,
};
