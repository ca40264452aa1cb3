use serde_json::Value;
use web3ws::codec::{CodecError, RpcParams};
use web3ws::constants::DEFAULT_BLOCK_ID;

/// A block number in hex or one of the tags `latest`, `earliest`, `pending`.
pub type BlockId = String;

/// An account address paired with the block to evaluate it at.
///
/// Encoded positionally as `[address, blockId]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressWithBlock {
    pub address: String,
    pub block_id: BlockId,
}

impl AddressWithBlock {
    /// Refers to `address` at the latest block.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            block_id: DEFAULT_BLOCK_ID.to_owned(),
        }
    }

    pub fn at_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.block_id = block_id.into();
        self
    }
}

impl Default for AddressWithBlock {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl RpcParams for AddressWithBlock {
    fn to_params(&self) -> Result<Value, CodecError> {
        Ok(Value::Array(vec![
            Value::from(self.address.as_str()),
            Value::from(self.block_id.as_str()),
        ]))
    }

    fn from_params(params: Option<&Value>) -> Result<Self, CodecError> {
        let entries = params
            .and_then(Value::as_array)
            .ok_or_else(|| CodecError::InvalidParams("expected `[address, blockId]`".into()))?;

        let address = entries
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::InvalidParams("address must be a string".into()))?;

        let block_id = match entries.get(1) {
            None => DEFAULT_BLOCK_ID,
            Some(value) => value
                .as_str()
                .ok_or_else(|| CodecError::InvalidParams("blockId must be a string".into()))?,
        };

        Ok(Self::new(address).at_block(block_id))
    }
}
