mod rpc_method;
pub use rpc_method::*;
mod macros;
pub use macros::*;
