use super::AddressWithBlock;
use web3ws_rpc_service::RpcMethod;

/// `eth_getBalance`: the balance of an account, as a hex-encoded quantity of wei.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthBalance;

impl RpcMethod for EthBalance {
    const METHOD_NAME: &'static str = "eth_getBalance";

    type Params = AddressWithBlock;
    type Result = String;
}
