use example_web3ws_eth_service_definition::eth::{AddressWithBlock, EthBalance, EthSyncing};
use tokio::join;
use tracing_subscriber::EnvFilter;
use web3ws_tokio_rpc_client::{RpcCall, RpcClient, RpcClientConfig, RpcTransportState};

const DEFAULT_URL: &str = "ws://127.0.0.1:8546";

/// Account queried by the balance call.
const DEMO_ADDRESS: &str = "0x407d73d8a49eeb85d32cf465507dd71d507100c1";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    // First argument wins over the environment
    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEB3WS_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let rpc_client = RpcClient::new(url.as_str(), RpcClientConfig::default());

    rpc_client.set_state_change_handler(|state| match state {
        RpcTransportState::Connected => tracing::info!("Transport is up"),
        RpcTransportState::Disconnected => tracing::info!("Transport is down"),
    });
    rpc_client.set_ready_handler(|transport| {
        tracing::info!("Node at {} is ready", transport.url());
    });

    rpc_client.connect().await?;

    // `join!` will await all responses before proceeding
    let (syncing, balance) = join!(
        EthSyncing::call(&rpc_client, ()),
        EthBalance::call(&rpc_client, AddressWithBlock::new(DEMO_ADDRESS)),
    );

    println!("Result from eth_syncing: {:?}", syncing);
    println!("Result from eth_getBalance({DEMO_ADDRESS}): {:?}", balance);

    rpc_client.disconnect();

    Ok(())
}
