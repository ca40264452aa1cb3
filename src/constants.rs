use std::time::Duration;

/// The only protocol version accepted on the wire, in either direction.
pub const JSON_RPC_VERSION: &str = "2.0";

// Envelope member names
pub const JSON_RPC_FIELD: &str = "jsonrpc";
pub const ID_FIELD: &str = "id";
pub const METHOD_FIELD: &str = "method";
pub const PARAMS_FIELD: &str = "params";
pub const RESULT_FIELD: &str = "result";
pub const ERROR_FIELD: &str = "error";

/// Block tag used when a caller does not name a block explicitly.
pub const DEFAULT_BLOCK_ID: &str = "latest";

/// Per-call deadline applied to ordinary RPC calls.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Wall-clock budget for the connection handshake, measured from connect start.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a connecting caller re-checks the handshake success flag.
pub const DEFAULT_HANDSHAKE_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// How often outstanding calls are scanned for elapsed deadlines.
pub const DEFAULT_EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_millis(50);

/// Method issued as the connection handshake.
pub const DEFAULT_HANDSHAKE_METHOD: &str = "web3_clientVersion";
