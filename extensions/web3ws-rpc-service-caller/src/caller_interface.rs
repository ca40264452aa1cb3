use crate::TransportError;
use futures::channel::oneshot;
use std::sync::Arc;
use std::time::{Duration, Instant};
use web3ws::codec::{RpcParams, RpcRequest, encode_request};
use web3ws::rpc::{CorrelationTable, RpcCallError, RpcCompletion, RpcIdGenerator, RpcOutcome};
use web3ws_rpc_service::RpcMethod;

/// Function used to hand encoded requests to the transport.
pub type RpcEmitFn = Arc<dyn Fn(Vec<u8>) -> Result<(), TransportError> + Send + Sync>;

/// Defines a generic capability for making RPC calls.
///
/// Anything that can provide a correlation table, an id source and a way to
/// emit bytes gets typed calls for free through the provided methods.
#[async_trait::async_trait]
pub trait RpcServiceCallerInterface: Send + Sync {
    // --- METHODS TO BE IMPLEMENTED BY THE STRUCT (e.g., RpcClient) ---

    fn get_correlation_table(&self) -> Arc<CorrelationTable>;

    fn get_id_generator(&self) -> Arc<RpcIdGenerator>;

    fn get_emit_fn(&self) -> RpcEmitFn;

    /// Deadline applied to calls made through [`Self::call_rpc`].
    fn get_call_timeout(&self) -> Duration;

    /// Whether application calls are currently allowed.
    fn is_ready(&self) -> bool;

    // --- METHODS PROVIDED AUTOMATICALLY BY THE TRAIT ---

    /// Registers `request` and sends it, bypassing the readiness gate.
    ///
    /// `completion` fires exactly once, with the response or with a timeout
    /// or close error, unless this returns an error: in that case the call
    /// was never outstanding and `completion` is dropped unused.
    fn submit_request<P>(
        &self,
        request: RpcRequest<P>,
        timeout: Duration,
        completion: RpcCompletion,
    ) -> Result<(), RpcCallError>
    where
        P: RpcParams,
    {
        let bytes = encode_request(&request)?;
        let table = self.get_correlation_table();

        table.register(request.id, Instant::now() + timeout, completion)?;
        tracing::debug!("Sending `{}` as request {}", request.method, request.id);

        if let Err(err) = (self.get_emit_fn())(bytes) {
            table.cancel(request.id);
            tracing::warn!(
                "Transport rejected `{}` (request {}): {}",
                request.method,
                request.id,
                err
            );
            return Err(RpcCallError::SendFailed(err.to_string()));
        }

        Ok(())
    }

    /// Performs a typed call and waits for its outcome.
    async fn call_rpc<M>(&self, params: M::Params) -> Result<M::Result, RpcCallError>
    where
        M: RpcMethod + Send + Sync + 'static,
        M::Params: Send + 'static,
        M::Result: Send + 'static,
    {
        if !self.is_ready() {
            return Err(RpcCallError::NotReady);
        }

        let mut request = M::make_request(self.get_id_generator().next_id());
        request.params = params;

        let (done_tx, done_rx) = oneshot::channel::<RpcOutcome>();
        let completion: RpcCompletion = Box::new(move |outcome| {
            let _ = done_tx.send(outcome);
        });

        self.submit_request(request, self.get_call_timeout(), completion)?;

        let outcome = done_rx.await.map_err(|_| RpcCallError::ConnectionClosed)?;
        let value = outcome?;

        Ok(M::decode_result(value)?)
    }
}
