use std::time::Duration;
use web3ws::constants::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_EXPIRY_SWEEP_INTERVAL, DEFAULT_HANDSHAKE_METHOD,
    DEFAULT_HANDSHAKE_POLL_INTERVAL, DEFAULT_HANDSHAKE_TIMEOUT,
};

/// Timing and handshake settings for an [`RpcClient`](crate::RpcClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use web3ws_tokio_rpc_client::RpcClientConfig;
///
/// let config = RpcClientConfig::default()
///     .with_handshake_timeout(Duration::from_secs(2))
///     .with_call_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.handshake_method, "web3_clientVersion");
/// ```
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    /// Deadline for each application call, independent of the handshake.
    ///
    /// Default: 30 seconds
    pub call_timeout: Duration,

    /// Wall-clock budget for the handshake, measured from the start of
    /// `connect()`. Exceeding it is fatal to the attempt.
    ///
    /// Default: 10 seconds
    pub handshake_timeout: Duration,

    /// How often `connect()` re-checks whether the handshake has finished.
    ///
    /// Default: 300 milliseconds
    pub handshake_poll_interval: Duration,

    /// How often outstanding calls are checked against their deadlines. A
    /// call times out no earlier than its deadline and at most one sweep
    /// interval after it.
    ///
    /// Default: 50 milliseconds
    pub expiry_sweep_interval: Duration,

    /// Method sent, with no params, as the connection handshake. Any
    /// non-error result counts as success.
    pub handshake_method: String,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            handshake_poll_interval: DEFAULT_HANDSHAKE_POLL_INTERVAL,
            expiry_sweep_interval: DEFAULT_EXPIRY_SWEEP_INTERVAL,
            handshake_method: DEFAULT_HANDSHAKE_METHOD.to_owned(),
        }
    }
}

impl RpcClientConfig {
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_handshake_poll_interval(mut self, interval: Duration) -> Self {
        self.handshake_poll_interval = interval;
        self
    }

    pub fn with_expiry_sweep_interval(mut self, interval: Duration) -> Self {
        self.expiry_sweep_interval = interval;
        self
    }

    pub fn with_handshake_method(mut self, method: impl Into<String>) -> Self {
        self.handshake_method = method.into();
        self
    }
}
