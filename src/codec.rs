mod codec_error;
mod rpc_params;
mod rpc_request;
mod rpc_response;

pub use codec_error::CodecError;
pub use rpc_params::RpcParams;
pub use rpc_request::{RpcRequest, decode_request, encode_request};
pub use rpc_response::{RpcErrorObject, RpcResponse, decode_response, encode_response};
