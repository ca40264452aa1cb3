use crate::{RpcClientConfig, RpcClientError, WsTransport};
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use web3ws::codec::RpcRequest;
use web3ws::rpc::{CorrelationTable, RpcCallError, RpcCompletion, RpcIdGenerator};
use web3ws::utils::lock_ignore_poison;
use web3ws_rpc_service::RpcMethod;
use web3ws_rpc_service_caller::{
    HandshakeController, HandshakeState, RpcEmitFn, RpcServiceCallerInterface, RpcTransport,
    RpcTransportState, TransportEvent,
};

type ReadyHandler<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;
type StateChangeHandler = Arc<dyn Fn(RpcTransportState) + Send + Sync>;

/// Clears the in-progress flag however `connect()` exits, cancellation included.
struct ConnectingGuard<'a>(&'a AtomicBool);

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A JSON-RPC client bound to one transport.
///
/// `connect()` opens the transport, sends the handshake call and resolves
/// once it has succeeded. Until then, and after any disconnect, application
/// calls fail fast with [`RpcCallError::NotReady`].
pub struct RpcClient<T: RpcTransport> {
    transport: Arc<T>,
    config: RpcClientConfig,
    correlation_table: Arc<CorrelationTable>,
    id_generator: Arc<RpcIdGenerator>,
    handshake: Arc<HandshakeController>,
    is_connected: Arc<AtomicBool>,
    is_connecting: AtomicBool,
    ready_handler: Arc<Mutex<Option<ReadyHandler<T>>>>,
    state_change_handler: Arc<Mutex<Option<StateChangeHandler>>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RpcClient<WsTransport> {
    /// Creates a client for the WebSocket endpoint at `url`. Nothing is
    /// opened until [`RpcClient::connect`].
    pub fn new(url: impl Into<String>, config: RpcClientConfig) -> Self {
        Self::with_transport(WsTransport::new(url), config)
    }
}

impl<T: RpcTransport> RpcClient<T> {
    pub fn with_transport(transport: T, config: RpcClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
            correlation_table: Arc::new(CorrelationTable::new()),
            id_generator: Arc::new(RpcIdGenerator::new()),
            handshake: Arc::new(HandshakeController::new()),
            is_connected: Arc::new(AtomicBool::new(false)),
            is_connecting: AtomicBool::new(false),
            ready_handler: Arc::new(Mutex::new(None)),
            state_change_handler: Arc::new(Mutex::new(None)),
            task_handles: Mutex::new(Vec::new()),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake.state()
    }

    /// Number of calls, handshake included, still waiting for an outcome.
    pub fn pending_calls(&self) -> usize {
        self.correlation_table.len()
    }

    /// Invoked with the transport each time a handshake succeeds.
    pub fn set_ready_handler<F>(&self, handler: F)
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        *lock_ignore_poison(&self.ready_handler) = Some(Arc::new(handler));
    }

    pub fn set_state_change_handler<F>(&self, handler: F)
    where
        F: Fn(RpcTransportState) + Send + Sync + 'static,
    {
        *lock_ignore_poison(&self.state_change_handler) = Some(Arc::new(handler));
    }

    /// Opens the transport and performs the handshake.
    ///
    /// Resolves `Ok` only once the handshake call has succeeded. The
    /// handshake budget covers opening the transport too. On any failure the
    /// session is dropped before returning, and the client may be connected
    /// again.
    pub async fn connect(&self) -> Result<(), RpcClientError> {
        if self.is_connecting.swap(true, Ordering::SeqCst) {
            return Err(RpcClientError::AlreadyConnected);
        }
        let _connecting = ConnectingGuard(&self.is_connecting);

        if !self.handshake.reset() || !self.handshake.begin() {
            return Err(RpcClientError::AlreadyConnected);
        }

        let started = Instant::now();
        let (events_tx, events_rx) = mpsc::unbounded();

        let opened = tokio::time::timeout(
            self.config.handshake_timeout,
            self.transport.connect(events_tx),
        )
        .await;

        match opened {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!("Transport failed to connect: {}", err);
                self.handshake.on_disconnect();
                return Err(err.into());
            }
            Err(_) => {
                tracing::warn!(
                    "Transport did not open within {:?}",
                    self.config.handshake_timeout
                );
                self.handshake.on_failure(RpcCallError::Timeout);
                self.transport.drop_session("transport did not open in time");
                return Err(RpcClientError::HandshakeTimeout(
                    self.config.handshake_timeout,
                ));
            }
        }

        self.is_connected.store(true, Ordering::SeqCst);
        emit_state_change(&self.state_change_handler, RpcTransportState::Connected);
        self.spawn_background_tasks(events_rx);

        let request = RpcRequest::new(
            self.id_generator.next_id(),
            self.config.handshake_method.as_str(),
            (),
        );
        tracing::info!(
            "Transport connected; sending `{}` handshake",
            self.config.handshake_method
        );

        let remaining = self.config.handshake_timeout.saturating_sub(started.elapsed());
        let completion = self.handshake_completion();
        if let Err(err) = self.submit_request(request, remaining, completion) {
            self.handshake.on_failure(err);
            return Err(self.fail_connect("handshake could not be sent"));
        }

        self.wait_for_handshake(started).await
    }

    /// Drops the session and fails every outstanding call with
    /// [`RpcCallError::ConnectionClosed`]. Safe to call repeatedly.
    pub fn disconnect(&self) {
        self.teardown("client disconnect");
        self.handshake.on_disconnect();
    }

    /// Performs a typed call over this client.
    pub async fn call<M>(&self, params: M::Params) -> Result<M::Result, RpcCallError>
    where
        M: RpcMethod + Send + Sync + 'static,
        M::Params: Send + 'static,
        M::Result: Send + 'static,
    {
        self.call_rpc::<M>(params).await
    }

    async fn wait_for_handshake(&self, started: Instant) -> Result<(), RpcClientError> {
        let deadline = started + self.config.handshake_timeout;

        loop {
            tokio::time::sleep(self.config.handshake_poll_interval).await;

            match self.handshake.state() {
                HandshakeState::Ready => return Ok(()),
                HandshakeState::Failed => return Err(self.fail_connect("handshake failed")),
                HandshakeState::Idle | HandshakeState::AwaitingHandshakeResponse => {}
            }

            if Instant::now() >= deadline {
                if !self.handshake.on_failure(RpcCallError::Timeout) && self.handshake.is_ready() {
                    // Succeeded between the state check and the deadline check.
                    return Ok(());
                }

                return Err(self.fail_connect("handshake timed out"));
            }
        }
    }

    /// Tears the attempt down and converts the recorded handshake failure.
    fn fail_connect(&self, reason: &str) -> RpcClientError {
        self.teardown(reason);

        match self.handshake.take_failure() {
            None | Some(RpcCallError::Timeout) => {
                tracing::warn!(
                    "No handshake response within {:?}",
                    self.config.handshake_timeout
                );
                RpcClientError::HandshakeTimeout(self.config.handshake_timeout)
            }
            Some(err) => {
                tracing::warn!("Handshake rejected: {}", err);
                RpcClientError::HandshakeRejected(err)
            }
        }
    }

    fn handshake_completion(&self) -> RpcCompletion {
        let handshake = self.handshake.clone();
        let transport = self.transport.clone();
        let ready_handler = self.ready_handler.clone();

        Box::new(move |outcome| match outcome {
            Ok(_) => {
                if handshake.on_success() {
                    tracing::info!("Handshake succeeded; client is ready");

                    let handler = lock_ignore_poison(&ready_handler).clone();
                    if let Some(handler) = handler {
                        handler(&transport);
                    }
                }
            }
            Err(err) => {
                // Timeouts and closes are handled by whoever drives `connect()`.
                if !matches!(err, RpcCallError::Timeout | RpcCallError::ConnectionClosed) {
                    transport.drop_session("handshake rejected");
                }

                handshake.on_failure(err);
            }
        })
    }

    fn spawn_background_tasks(&self, mut events_rx: UnboundedReceiver<TransportEvent>) {
        self.abort_tasks();

        // Expiry sweep
        let table = self.correlation_table.clone();
        let sweep_interval = self.config.expiry_sweep_interval;
        let sweep = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let expired = table.expire(Instant::now());

                if expired > 0 {
                    tracing::debug!("Expired {} call(s)", expired);
                }
            }
        });

        let sweep_abort = sweep.abort_handle();
        let table = self.correlation_table.clone();
        let transport = self.transport.clone();
        let handshake = self.handshake.clone();
        let is_connected = self.is_connected.clone();
        let state_change_handler = self.state_change_handler.clone();

        // Inbound loop
        let inbound = tokio::spawn(async move {
            while let Some(event) = events_rx.next().await {
                match event {
                    TransportEvent::Message(bytes) => {
                        if let Err(err) = table.dispatch_response(&bytes) {
                            tracing::warn!("Discarding inbound message: {}", err);
                        }
                    }
                    TransportEvent::Disconnected(reason) => {
                        tracing::info!(
                            "Transport disconnected: {}",
                            reason.as_deref().unwrap_or("no reason given")
                        );
                        break;
                    }
                }
            }

            // The session ended on its own; a client-side teardown aborts this
            // task instead.
            if is_connected.swap(false, Ordering::SeqCst) {
                transport.drop_session("transport disconnected");
                sweep_abort.abort();

                let closed = table.close_all();
                handshake.on_disconnect();

                if closed > 0 {
                    tracing::info!("Closed {} pending call(s) after disconnect", closed);
                }

                emit_state_change(&state_change_handler, RpcTransportState::Disconnected);
            }
        });

        lock_ignore_poison(&self.task_handles).extend([inbound, sweep]);
    }

    fn abort_tasks(&self) {
        for handle in lock_ignore_poison(&self.task_handles).drain(..) {
            handle.abort();
        }
    }

    fn teardown(&self, reason: &str) {
        let was_connected = self.is_connected.swap(false, Ordering::SeqCst);

        if was_connected {
            self.transport.drop_session(reason);
        }

        self.abort_tasks();
        let closed = self.correlation_table.close_all();

        if was_connected {
            tracing::info!("Disconnected ({}); closed {} pending call(s)", reason, closed);
            emit_state_change(&self.state_change_handler, RpcTransportState::Disconnected);
        }
    }
}

/// Runs the handler outside its lock, so it may replace itself.
fn emit_state_change(handler: &Mutex<Option<StateChangeHandler>>, state: RpcTransportState) {
    let handler = lock_ignore_poison(handler).clone();

    if let Some(handler) = handler {
        handler(state);
    }
}

impl<T: RpcTransport> Drop for RpcClient<T> {
    fn drop(&mut self) {
        self.teardown("client dropped");
    }
}

#[async_trait::async_trait]
impl<T: RpcTransport> RpcServiceCallerInterface for RpcClient<T> {
    fn get_correlation_table(&self) -> Arc<CorrelationTable> {
        self.correlation_table.clone()
    }

    fn get_id_generator(&self) -> Arc<RpcIdGenerator> {
        self.id_generator.clone()
    }

    fn get_emit_fn(&self) -> RpcEmitFn {
        let transport = self.transport.clone();
        Arc::new(move |bytes: Vec<u8>| transport.send(bytes))
    }

    fn get_call_timeout(&self) -> Duration {
        self.config.call_timeout
    }

    fn is_ready(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst) && self.handshake.is_ready()
    }
}
