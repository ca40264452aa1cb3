use web3ws_rpc_service::rpc_method;

rpc_method!(
    /// `eth_syncing`: whether the node is still catching up with the chain.
    ///
    /// Nodes that are syncing may answer with a progress object instead of
    /// `true`; this descriptor only accepts the boolean form.
    EthSyncing,
    "eth_syncing",
    (),
    bool
);
