use web3ws_rpc_service::rpc_method;

rpc_method!(
    /// `web3_clientVersion`: the node's client identifier. Used as the
    /// default connection handshake.
    Web3ClientVersion,
    "web3_clientVersion",
    (),
    String
);
