use super::CodecError;
use super::rpc_request::{open_envelope, read_id};
use crate::constants::{ERROR_FIELD, ID_FIELD, JSON_RPC_FIELD, JSON_RPC_VERSION, RESULT_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The `error` member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl fmt::Display for RpcErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// A decoded response envelope.
///
/// `outcome` holds the still-encoded `result` value; turning it into a typed
/// value is up to the descriptor that issued the call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub id: u16,
    pub outcome: Result<Value, RpcErrorObject>,
}

impl RpcResponse {
    pub fn success(id: u16, result: Value) -> Self {
        Self {
            id,
            outcome: Ok(result),
        }
    }

    pub fn failure(id: u16, error: RpcErrorObject) -> Self {
        Self {
            id,
            outcome: Err(error),
        }
    }
}

pub fn encode_response(response: &RpcResponse) -> Result<Vec<u8>, CodecError> {
    let mut envelope = Map::new();
    envelope.insert(JSON_RPC_FIELD.into(), Value::from(JSON_RPC_VERSION));
    envelope.insert(ID_FIELD.into(), Value::from(response.id));

    match &response.outcome {
        Ok(result) => {
            envelope.insert(RESULT_FIELD.into(), result.clone());
        }
        Err(error) => {
            envelope.insert(ERROR_FIELD.into(), serde_json::to_value(error)?);
        }
    }

    Ok(serde_json::to_vec(&Value::Object(envelope))?)
}

/// Decodes a response envelope.
///
/// An `error` member takes precedence over `result`. A `result` of `null` is
/// a valid success value.
pub fn decode_response(bytes: &[u8]) -> Result<RpcResponse, CodecError> {
    let mut envelope = open_envelope(bytes)?;
    let id = read_id(&envelope)?;

    if let Some(error) = envelope.remove(ERROR_FIELD) {
        let error = serde_json::from_value::<RpcErrorObject>(error)?;
        return Ok(RpcResponse::failure(id, error));
    }

    match envelope.remove(RESULT_FIELD) {
        Some(result) => Ok(RpcResponse::success(id, result)),
        None => Err(CodecError::MissingField(RESULT_FIELD)),
    }
}
