use std::sync::atomic::{AtomicU16, Ordering};

/// Connection-scoped source of request ids.
///
/// The counter covers the 16-bit id space and wraps on overflow, so an id is
/// only unique among calls that are outstanding at the same time.
#[derive(Debug, Default)]
pub struct RpcIdGenerator {
    counter: AtomicU16,
}

impl RpcIdGenerator {
    /// Creates a generator whose first issued id is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first issued id is `first`.
    pub fn starting_at(first: u16) -> Self {
        Self {
            counter: AtomicU16::new(first),
        }
    }

    #[inline]
    pub fn next_id(&self) -> u16 {
        // `fetch_add` on atomics wraps around on overflow.
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically() {
        let ids = RpcIdGenerator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn ids_wrap_on_overflow() {
        let ids = RpcIdGenerator::starting_at(u16::MAX);
        assert_eq!(ids.next_id(), u16::MAX);
        assert_eq!(ids.next_id(), 0);
    }
}
