use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use web3ws::rpc::RpcCallError;
use web3ws::utils::lock_ignore_poison;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    AwaitingHandshakeResponse,
    Ready,
    Failed,
}

#[derive(Debug)]
struct HandshakeInner {
    state: HandshakeState,
    failure: Option<RpcCallError>,
}

/// Tracks the one handshake call that gates a connection.
///
/// Transitions:
///
/// ```text
/// Idle -> AwaitingHandshakeResponse -> Ready
///   |              |
///   +--------------+--> Failed
/// ```
///
/// The controller holds no timers. Whoever drives the connection polls
/// [`HandshakeController::state`] and decides when the wall-clock budget has
/// run out.
#[derive(Debug)]
pub struct HandshakeController {
    inner: Mutex<HandshakeInner>,
    success_count: AtomicUsize,
}

impl Default for HandshakeController {
    fn default() -> Self {
        Self::new()
    }
}

impl HandshakeController {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HandshakeInner {
                state: HandshakeState::Idle,
                failure: None,
            }),
            success_count: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> HandshakeState {
        lock_ignore_poison(&self.inner).state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == HandshakeState::Ready
    }

    /// Number of handshakes that have succeeded over the controller's lifetime.
    pub fn success_count(&self) -> usize {
        self.success_count.load(Ordering::Acquire)
    }

    /// `Idle -> AwaitingHandshakeResponse`. Returns `false` from any other state.
    pub fn begin(&self) -> bool {
        let mut inner = lock_ignore_poison(&self.inner);

        if inner.state != HandshakeState::Idle {
            return false;
        }

        inner.state = HandshakeState::AwaitingHandshakeResponse;
        true
    }

    /// Returns a finished or failed controller to `Idle` so a new connection
    /// attempt can start. Refuses while a handshake is in flight or the
    /// connection is ready.
    pub fn reset(&self) -> bool {
        let mut inner = lock_ignore_poison(&self.inner);

        match inner.state {
            HandshakeState::Idle | HandshakeState::Failed => {
                inner.state = HandshakeState::Idle;
                inner.failure = None;
                true
            }
            HandshakeState::AwaitingHandshakeResponse | HandshakeState::Ready => false,
        }
    }

    /// `AwaitingHandshakeResponse -> Ready`. A success arriving in any other
    /// state is ignored.
    pub fn on_success(&self) -> bool {
        let mut inner = lock_ignore_poison(&self.inner);

        if inner.state != HandshakeState::AwaitingHandshakeResponse {
            return false;
        }

        inner.state = HandshakeState::Ready;
        self.success_count.fetch_add(1, Ordering::Release);
        true
    }

    /// `Idle | AwaitingHandshakeResponse -> Failed`, remembering why.
    ///
    /// Only the first failure is kept.
    pub fn on_failure(&self, failure: RpcCallError) -> bool {
        let mut inner = lock_ignore_poison(&self.inner);

        match inner.state {
            HandshakeState::Idle | HandshakeState::AwaitingHandshakeResponse => {
                inner.state = HandshakeState::Failed;
                inner.failure = Some(failure);
                true
            }
            HandshakeState::Ready | HandshakeState::Failed => false,
        }
    }

    /// Records the end of the connection.
    ///
    /// A ready connection returns to `Idle` so the next connect starts a fresh
    /// handshake. A handshake still in flight fails with
    /// [`RpcCallError::ConnectionClosed`]. A `Failed` controller keeps its
    /// state until [`HandshakeController::reset`].
    pub fn on_disconnect(&self) {
        let mut inner = lock_ignore_poison(&self.inner);

        match inner.state {
            HandshakeState::Ready => inner.state = HandshakeState::Idle,
            HandshakeState::AwaitingHandshakeResponse => {
                inner.state = HandshakeState::Failed;
                inner.failure = Some(RpcCallError::ConnectionClosed);
            }
            HandshakeState::Idle | HandshakeState::Failed => {}
        }
    }

    /// Takes the recorded failure, if any. The state stays `Failed`.
    pub fn take_failure(&self) -> Option<RpcCallError> {
        lock_ignore_poison(&self.inner).failure.take()
    }
}
