mod address_with_block;
pub use address_with_block::{AddressWithBlock, BlockId};

mod eth_balance;
pub use eth_balance::EthBalance;

mod eth_syncing;
pub use eth_syncing::EthSyncing;

mod web3_client_version;
pub use web3_client_version::Web3ClientVersion;
