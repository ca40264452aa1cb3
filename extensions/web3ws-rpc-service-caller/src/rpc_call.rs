use crate::RpcServiceCallerInterface;
use web3ws::rpc::RpcCallError;
use web3ws_rpc_service::RpcMethod;

/// Lets call sites write `EthBalance::call(&client, params)` against any
/// caller, without naming the caller trait's methods.
#[async_trait::async_trait]
pub trait RpcCall: RpcMethod + Sized + Send + Sync {
    async fn call<C: RpcServiceCallerInterface>(
        rpc_client: &C,
        params: Self::Params,
    ) -> Result<Self::Result, RpcCallError>;
}

#[async_trait::async_trait]
impl<T> RpcCall for T
where
    T: RpcMethod + Send + Sync + 'static,
    T::Params: Send + 'static,
    T::Result: Send + 'static,
{
    async fn call<C: RpcServiceCallerInterface>(
        rpc_client: &C,
        params: Self::Params,
    ) -> Result<Self::Result, RpcCallError> {
        rpc_client.call_rpc::<T>(params).await
    }
}
