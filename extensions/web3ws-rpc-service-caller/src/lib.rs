mod caller_interface;
pub use caller_interface::*;
pub mod error;
pub use error::TransportError;
mod handshake_controller;
pub use handshake_controller::{HandshakeController, HandshakeState};
mod rpc_call;
pub use rpc_call::RpcCall;
mod transport;
pub use transport::*;
