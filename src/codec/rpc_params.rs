use super::CodecError;
use serde_json::Value;

/// Encoding rules for the `params` member of a request.
///
/// Each parameter type decides its own wire shape. Many Ethereum-style
/// methods take positional arrays rather than keyed objects, so nothing here
/// assumes one or the other.
pub trait RpcParams: Sized {
    fn to_params(&self) -> Result<Value, CodecError>;

    /// Rebuilds the parameters from the `params` member, if one was present.
    fn from_params(params: Option<&Value>) -> Result<Self, CodecError>;
}

/// Methods without parameters send an empty array and never look at the
/// member when decoding.
impl RpcParams for () {
    fn to_params(&self) -> Result<Value, CodecError> {
        Ok(Value::Array(Vec::new()))
    }

    fn from_params(_params: Option<&Value>) -> Result<Self, CodecError> {
        Ok(())
    }
}

/// Raw positional parameters, for calls without a dedicated type.
impl RpcParams for Vec<Value> {
    fn to_params(&self) -> Result<Value, CodecError> {
        Ok(Value::Array(self.clone()))
    }

    fn from_params(params: Option<&Value>) -> Result<Self, CodecError> {
        match params {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(other) => Err(CodecError::InvalidParams(format!(
                "expected a positional array, got {other}"
            ))),
        }
    }
}
