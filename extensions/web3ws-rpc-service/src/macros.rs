/// Declares a method descriptor as a unit struct.
///
/// ## Example
///
/// ```rust
/// use web3ws_rpc_service::{RpcMethod, rpc_method};
///
/// rpc_method!(
///     /// Reports whether the node is still syncing.
///     EthSyncing, "eth_syncing", (), bool
/// );
///
/// let request = EthSyncing::make_request(4);
/// assert_eq!(request.method, "eth_syncing");
/// assert_eq!(request.id, 4);
/// ```
#[macro_export]
macro_rules! rpc_method {
    ($(#[$meta:meta])* $name:ident, $method:literal, $params:ty, $result:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::RpcMethod for $name {
            const METHOD_NAME: &'static str = $method;
            type Params = $params;
            type Result = $result;
        }
    };
}
