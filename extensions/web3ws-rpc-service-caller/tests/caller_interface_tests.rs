use example_web3ws_eth_service_definition::eth::{AddressWithBlock, EthBalance, EthSyncing};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use web3ws::rpc::{CorrelationTable, RpcCallError, RpcIdGenerator};
use web3ws_rpc_service_caller::{
    RpcCall, RpcEmitFn, RpcServiceCallerInterface, TransportError,
};

type Responder = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

// --- Test Setup: Mock Implementations ---

/// A caller whose "transport" records every outbound message and, when a
/// responder is set, answers synchronously from inside the send.
struct MockCaller {
    table: Arc<CorrelationTable>,
    ids: Arc<RpcIdGenerator>,
    sent: Arc<Mutex<Vec<Value>>>,
    responder: Option<Responder>,
    fail_sends: bool,
    ready: bool,
    call_timeout: Duration,
}

impl MockCaller {
    fn new() -> Self {
        Self {
            table: Arc::new(CorrelationTable::new()),
            ids: Arc::new(RpcIdGenerator::starting_at(1)),
            sent: Arc::new(Mutex::new(Vec::new())),
            responder: None,
            fail_sends: false,
            ready: true,
            call_timeout: Duration::from_secs(5),
        }
    }

    fn responding_with(mut self, responder: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }
}

#[async_trait::async_trait]
impl RpcServiceCallerInterface for MockCaller {
    fn get_correlation_table(&self) -> Arc<CorrelationTable> {
        self.table.clone()
    }

    fn get_id_generator(&self) -> Arc<RpcIdGenerator> {
        self.ids.clone()
    }

    fn get_emit_fn(&self) -> RpcEmitFn {
        let table = self.table.clone();
        let sent = self.sent.clone();
        let responder = self.responder.clone();
        let fail_sends = self.fail_sends;

        Arc::new(move |bytes: Vec<u8>| {
            if fail_sends {
                return Err(TransportError::SendFailed("socket closed".into()));
            }

            let request: Value = serde_json::from_slice(&bytes).unwrap();
            sent.lock().unwrap().push(request.clone());

            if let Some(response) = responder.as_ref().and_then(|respond| respond(&request)) {
                let bytes = serde_json::to_vec(&response).unwrap();
                table.dispatch_response(&bytes).unwrap();
            }

            Ok(())
        })
    }

    fn get_call_timeout(&self) -> Duration {
        self.call_timeout
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

// --- Unit Tests ---

#[tokio::test]
async fn balance_call_encodes_positional_params_and_decodes_result() {
    let caller = MockCaller::new().responding_with(|request| {
        Some(json!({"jsonrpc": "2.0", "id": request["id"], "result": "0x10"}))
    });

    let balance = caller
        .call_rpc::<EthBalance>(AddressWithBlock::new("0xabc"))
        .await
        .unwrap();

    assert_eq!(balance, "0x10");

    let sent = caller.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        json!({"jsonrpc": "2.0", "id": 1, "method": "eth_getBalance", "params": ["0xabc", "latest"]})
    );
    assert!(caller.table.is_empty());
}

#[tokio::test]
async fn descriptor_call_trait_uses_the_caller() {
    let caller = MockCaller::new().responding_with(|request| {
        Some(json!({"jsonrpc": "2.0", "id": request["id"], "result": false}))
    });

    let syncing = EthSyncing::call(&caller, ()).await.unwrap();
    assert!(!syncing);
    assert_eq!(caller.sent.lock().unwrap()[0]["params"], json!([]));
}

#[tokio::test]
async fn remote_error_object_fails_the_call() {
    let caller = MockCaller::new().responding_with(|request| {
        Some(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": {"code": -32601, "message": "the method eth_syncing does not exist"}
        }))
    });

    match EthSyncing::call(&caller, ()).await {
        Err(RpcCallError::Remote(error)) => assert_eq!(error.code, -32601),
        other => panic!("expected a remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn mistyped_result_is_a_codec_error() {
    let caller = MockCaller::new().responding_with(|request| {
        Some(json!({"jsonrpc": "2.0", "id": request["id"], "result": {"startingBlock": "0x0"}}))
    });

    assert!(matches!(
        EthSyncing::call(&caller, ()).await,
        Err(RpcCallError::Codec(_))
    ));
}

#[tokio::test]
async fn send_failure_fails_immediately_and_clears_pending() {
    let mut caller = MockCaller::new();
    caller.fail_sends = true;
    // Long enough that only the send failure can end the call within the test.
    caller.call_timeout = Duration::from_secs(3600);

    let result = tokio::time::timeout(Duration::from_secs(1), EthSyncing::call(&caller, ()))
        .await
        .expect("send failure should not wait for the call timeout");

    assert!(matches!(result, Err(RpcCallError::SendFailed(_))));
    assert!(caller.table.is_empty());
}

#[tokio::test]
async fn calls_are_refused_until_ready() {
    let mut caller = MockCaller::new();
    caller.ready = false;

    assert!(matches!(
        EthSyncing::call(&caller, ()).await,
        Err(RpcCallError::NotReady)
    ));
    assert!(caller.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unanswered_call_times_out_and_late_response_is_dropped() {
    let mut caller = MockCaller::new();
    caller.call_timeout = Duration::from_millis(30);

    let table = caller.table.clone();
    let sweeper = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(5)).await;
            table.expire(std::time::Instant::now());
        }
    });

    let started = std::time::Instant::now();
    let result = EthSyncing::call(&caller, ()).await;
    sweeper.abort();

    assert!(matches!(result, Err(RpcCallError::Timeout)));
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(caller.table.is_empty());

    let id = caller.sent.lock().unwrap()[0]["id"].as_u64().unwrap();
    let late = format!(r#"{{"jsonrpc":"2.0","id":{id},"result":true}}"#);
    assert!(!caller.table.dispatch_response(late.as_bytes()).unwrap());
    assert_eq!(caller.table.dropped_responses(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_matched_by_id() {
    let caller = Arc::new(MockCaller::new().responding_with(|request| {
        let address = request["params"][0].as_str().unwrap().to_owned();
        Some(json!({"jsonrpc": "2.0", "id": request["id"], "result": address}))
    }));

    let calls: Vec<_> = (0..32)
        .map(|n| {
            let caller = caller.clone();
            tokio::spawn(async move {
                let address = format!("0x{n:x}");
                let result = EthBalance::call(caller.as_ref(), AddressWithBlock::new(address.clone()))
                    .await
                    .unwrap();
                (address, result)
            })
        })
        .collect();

    for call in calls {
        let (address, result) = call.await.unwrap();
        assert_eq!(address, result);
    }
    assert!(caller.table.is_empty());
}
