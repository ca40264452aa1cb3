use super::{CodecError, RpcParams};
use crate::constants::{
    ID_FIELD, JSON_RPC_FIELD, JSON_RPC_VERSION, METHOD_FIELD, PARAMS_FIELD,
};
use serde_json::{Map, Value};

/// A single outbound call, before encoding.
///
/// The protocol version is not stored; it is a constant written on encode and
/// enforced on decode.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest<P> {
    /// Correlation id, unique among the calls currently outstanding on a
    /// connection (not across its lifetime).
    pub id: u16,

    pub method: String,

    pub params: P,
}

impl<P> RpcRequest<P> {
    pub fn new(id: u16, method: impl Into<String>, params: P) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

pub fn encode_request<P: RpcParams>(request: &RpcRequest<P>) -> Result<Vec<u8>, CodecError> {
    let mut envelope = Map::new();
    envelope.insert(JSON_RPC_FIELD.into(), Value::from(JSON_RPC_VERSION));
    envelope.insert(ID_FIELD.into(), Value::from(request.id));
    envelope.insert(METHOD_FIELD.into(), Value::from(request.method.as_str()));
    envelope.insert(PARAMS_FIELD.into(), request.params.to_params()?);

    Ok(serde_json::to_vec(&Value::Object(envelope))?)
}

/// Decodes a request envelope.
///
/// The protocol version is checked before anything else is read, so a
/// mismatching envelope never yields an id or method.
pub fn decode_request<P: RpcParams>(bytes: &[u8]) -> Result<RpcRequest<P>, CodecError> {
    let envelope = open_envelope(bytes)?;

    let id = read_id(&envelope)?;
    let method = envelope
        .get(METHOD_FIELD)
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField(METHOD_FIELD))?
        .to_owned();
    let params = P::from_params(envelope.get(PARAMS_FIELD))?;

    Ok(RpcRequest { id, method, params })
}

/// Parses `bytes` as a JSON object and validates its `jsonrpc` member.
pub(super) fn open_envelope(bytes: &[u8]) -> Result<Map<String, Value>, CodecError> {
    let envelope = match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => map,
        _ => return Err(CodecError::NotAnObject),
    };

    match envelope.get(JSON_RPC_FIELD).and_then(Value::as_str) {
        Some(JSON_RPC_VERSION) => Ok(envelope),
        _ => Err(CodecError::ProtocolVersionMismatch {
            payload: String::from_utf8_lossy(bytes).into_owned(),
        }),
    }
}

pub(super) fn read_id(envelope: &Map<String, Value>) -> Result<u16, CodecError> {
    let raw = envelope
        .get(ID_FIELD)
        .ok_or(CodecError::MissingField(ID_FIELD))?;

    raw.as_u64()
        .and_then(|id| u16::try_from(id).ok())
        .ok_or_else(|| CodecError::InvalidId(raw.clone()))
}
