use serde_json::Value;
use thiserror::Error;

/// Failures raised while turning bytes into envelopes or back.
///
/// Every variant is local to the message being processed; none of them
/// imply anything about the health of the connection.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The `jsonrpc` member was missing or carried an unsupported version.
    /// `payload` holds the raw text of the rejected envelope.
    #[error("unsupported JSON-RPC version in envelope: {payload}")]
    ProtocolVersionMismatch { payload: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("envelope is missing the `{0}` member")]
    MissingField(&'static str),

    /// The `id` member is not an unsigned integer in the 16-bit range.
    #[error("invalid request id: {0}")]
    InvalidId(Value),

    #[error("invalid params: {0}")]
    InvalidParams(String),
}
