use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use web3ws::codec::{CodecError, RpcParams, RpcRequest, decode_request, encode_request};

/// Static description of one remote method: its wire name, the shape of its
/// parameters and the shape of its result.
///
/// Implementors are usually unit structs that are never instantiated; the
/// type itself is the descriptor. Two descriptors share no state, and adding
/// one does not touch the caller, the correlation table, or the client.
pub trait RpcMethod {
    /// The `method` member written on the wire (e.g. `"eth_getBalance"`).
    const METHOD_NAME: &'static str;

    /// Parameters sent with the call. `()` for methods without parameters.
    type Params: RpcParams + Default;

    /// The decoded `result` member of a successful response.
    type Result: Serialize + DeserializeOwned;

    /// Builds a request stamped with this method's name and the given id.
    ///
    /// The params start out as their default and must be filled in by the
    /// caller before sending, unless the method takes none.
    fn make_request(id: u16) -> RpcRequest<Self::Params> {
        RpcRequest::new(id, Self::METHOD_NAME, Self::Params::default())
    }

    fn encode_request(request: &RpcRequest<Self::Params>) -> Result<Vec<u8>, CodecError> {
        encode_request(request)
    }

    /// Decodes a request envelope addressed to this method.
    fn decode_request(bytes: &[u8]) -> Result<RpcRequest<Self::Params>, CodecError> {
        let request = decode_request::<Self::Params>(bytes)?;

        if request.method != Self::METHOD_NAME {
            return Err(CodecError::InvalidParams(format!(
                "expected method `{}`, got `{}`",
                Self::METHOD_NAME,
                request.method
            )));
        }

        Ok(request)
    }

    fn encode_result(result: &Self::Result) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(result)?)
    }

    fn decode_result(result: Value) -> Result<Self::Result, CodecError> {
        Ok(serde_json::from_value(result)?)
    }
}
