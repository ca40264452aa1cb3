mod rpc_call_error;
mod rpc_correlation_table;
mod rpc_id_generator;

pub use rpc_call_error::RpcCallError;
pub use rpc_correlation_table::{
    CorrelationError, CorrelationTable, PendingCall, RpcCompletion, RpcOutcome,
};
pub use rpc_id_generator::RpcIdGenerator;
