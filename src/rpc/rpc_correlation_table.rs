use super::RpcCallError;
use crate::codec::{CodecError, decode_response};
use crate::utils::lock_ignore_poison;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use thiserror::Error;

/// What a pending call is completed with: the still-encoded `result` value,
/// or the reason the call failed.
pub type RpcOutcome = Result<Value, RpcCallError>;

/// Invoked exactly once with the outcome of a registered call.
pub type RpcCompletion = Box<dyn FnOnce(RpcOutcome) + Send + 'static>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("request id {0} is already outstanding")]
    DuplicateId(u16),
}

impl From<CorrelationError> for RpcCallError {
    fn from(err: CorrelationError) -> Self {
        match err {
            CorrelationError::DuplicateId(id) => RpcCallError::DuplicateId(id),
        }
    }
}

/// Bookkeeping for one outstanding request.
pub struct PendingCall {
    pub id: u16,
    pub deadline: Instant,
    completion: RpcCompletion,
}

impl PendingCall {
    fn finish(self, outcome: RpcOutcome) {
        (self.completion)(outcome)
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("id", &self.id)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// Maps outstanding request ids to their pending completions.
///
/// This is the one piece of state shared between callers and the transport's
/// inbound path. Every operation that finishes a call removes its entry under
/// the lock first and only then runs the completion, so whichever of
/// `complete`, `expire` or `close_all` takes the entry is the only one that
/// fires it.
#[derive(Default)]
pub struct CorrelationTable {
    pending: Mutex<HashMap<u16, PendingCall>>,
    dropped_responses: AtomicU64,
    expired_calls: AtomicU64,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a call that must be completed by `deadline`.
    ///
    /// Fails if `id` is still held by another outstanding call; the existing
    /// entry is left untouched.
    pub fn register(
        &self,
        id: u16,
        deadline: Instant,
        completion: RpcCompletion,
    ) -> Result<(), CorrelationError> {
        let mut pending = lock_ignore_poison(&self.pending);

        if pending.contains_key(&id) {
            return Err(CorrelationError::DuplicateId(id));
        }

        pending.insert(
            id,
            PendingCall {
                id,
                deadline,
                completion,
            },
        );

        tracing::trace!("Registered pending call {}", id);
        Ok(())
    }

    /// Completes the call registered under `id`.
    ///
    /// Returns `false` if no such call is outstanding (a late response for a
    /// call that already timed out, or an id that was never issued). Such
    /// responses are counted and otherwise ignored.
    pub fn complete(&self, id: u16, outcome: RpcOutcome) -> bool {
        let entry = lock_ignore_poison(&self.pending).remove(&id);

        match entry {
            Some(call) => {
                tracing::trace!("Completing pending call {}", id);
                call.finish(outcome);
                true
            }
            None => {
                self.dropped_responses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Dropping response for request id {} (not outstanding)", id);
                false
            }
        }
    }

    /// Fails every call whose deadline is at or before `now` with
    /// [`RpcCallError::Timeout`]. Returns how many calls expired.
    pub fn expire(&self, now: Instant) -> usize {
        let expired: Vec<PendingCall> = {
            let mut pending = lock_ignore_poison(&self.pending);

            let due: Vec<u16> = pending
                .values()
                .filter(|call| call.deadline <= now)
                .map(|call| call.id)
                .collect();

            due.iter().filter_map(|id| pending.remove(id)).collect()
        };

        let count = expired.len();
        if count > 0 {
            self.expired_calls
                .fetch_add(count as u64, Ordering::Relaxed);
            tracing::debug!("Expired {} pending call(s)", count);
        }

        for call in expired {
            call.finish(Err(RpcCallError::Timeout));
        }

        count
    }

    /// Removes the call registered under `id` without running its completion.
    ///
    /// Used when the request never left the process, so the caller learns of
    /// the failure directly.
    pub fn cancel(&self, id: u16) -> bool {
        lock_ignore_poison(&self.pending).remove(&id).is_some()
    }

    /// Fails every outstanding call with [`RpcCallError::ConnectionClosed`].
    pub fn close_all(&self) -> usize {
        let closed: Vec<PendingCall> = lock_ignore_poison(&self.pending)
            .drain()
            .map(|(_, call)| call)
            .collect();

        let count = closed.len();
        if count > 0 {
            tracing::debug!("Closing {} pending call(s)", count);
        }

        for call in closed {
            call.finish(Err(RpcCallError::ConnectionClosed));
        }

        count
    }

    /// Decodes an inbound response envelope and completes its call.
    ///
    /// A message that fails to decode completes nothing; the error is handed
    /// back so the caller can log it. Returns whether a call was completed.
    pub fn dispatch_response(&self, bytes: &[u8]) -> Result<bool, CodecError> {
        let response = decode_response(bytes)?;
        let outcome = response.outcome.map_err(RpcCallError::Remote);

        Ok(self.complete(response.id, outcome))
    }

    pub fn contains(&self, id: u16) -> bool {
        lock_ignore_poison(&self.pending).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        lock_ignore_poison(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Responses that arrived for ids with no outstanding call.
    pub fn dropped_responses(&self) -> u64 {
        self.dropped_responses.load(Ordering::Relaxed)
    }

    /// Calls failed by [`CorrelationTable::expire`].
    pub fn expired_calls(&self) -> u64 {
        self.expired_calls.load(Ordering::Relaxed)
    }
}
