use rand::seq::SliceRandom;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use web3ws::codec::{RpcResponse, encode_response};
use web3ws::rpc::{CorrelationTable, RpcCallError, RpcIdGenerator};

#[test]
fn concurrent_registrations_never_share_an_outstanding_id() {
    let table = Arc::new(CorrelationTable::new());
    let ids = Arc::new(RpcIdGenerator::new());
    let duplicates = Arc::new(AtomicUsize::new(0));
    let deadline = Instant::now() + Duration::from_secs(60);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let table = table.clone();
            let ids = ids.clone();
            let duplicates = duplicates.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let id = ids.next_id();
                    if table.register(id, deadline, Box::new(|_| {})).is_err() {
                        duplicates.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    // 8_000 calls fit comfortably inside the 16-bit id space.
    assert_eq!(duplicates.load(Ordering::Relaxed), 0);
    assert_eq!(table.len(), 8_000);
}

#[test]
fn wrapped_ids_are_reusable_once_completed() {
    let table = CorrelationTable::new();
    let ids = RpcIdGenerator::starting_at(u16::MAX);
    let deadline = Instant::now() + Duration::from_secs(60);

    let first = ids.next_id();
    table.register(first, deadline, Box::new(|_| {})).unwrap();
    assert!(table.complete(first, Ok(json!(1))));

    // Walk the whole id space back around to `first`.
    let mut id = ids.next_id();
    while id != first {
        id = ids.next_id();
    }
    assert!(table.register(id, deadline, Box::new(|_| {})).is_ok());
}

#[test]
fn racing_response_and_expiry_complete_each_call_once() {
    const CALLS: u16 = 2_000;

    let table = Arc::new(CorrelationTable::new());
    let fired: Arc<Vec<AtomicUsize>> =
        Arc::new((0..CALLS).map(|_| AtomicUsize::new(0)).collect());

    let deadline = Instant::now();
    for id in 0..CALLS {
        let fired = fired.clone();
        table
            .register(
                id,
                deadline,
                Box::new(move |_| {
                    fired[id as usize].fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
    }

    let barrier = Arc::new(Barrier::new(2));

    let responder = {
        let table = table.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for id in 0..CALLS {
                table.complete(id, Ok(json!(id)));
            }
        })
    };

    let sweeper = {
        let table = table.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                table.expire(Instant::now());
            }
        })
    };

    responder.join().unwrap();
    sweeper.join().unwrap();

    assert!(table.is_empty());
    assert!(fired.iter().all(|count| count.load(Ordering::SeqCst) == 1));

    // Every call lost by the responder was taken by the sweeper, and vice versa.
    assert_eq!(
        table.dropped_responses() + (CALLS as u64 - table.expired_calls()),
        CALLS as u64
    );
}

#[test]
fn out_of_order_responses_are_matched_by_id() {
    let table = CorrelationTable::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let deadline = Instant::now() + Duration::from_secs(60);

    for id in 0..64u16 {
        let received = received.clone();
        table
            .register(
                id,
                deadline,
                Box::new(move |outcome| {
                    received.lock().unwrap().push((id, outcome.unwrap()));
                }),
            )
            .unwrap();
    }

    let mut order: Vec<u16> = (0..64).collect();
    order.shuffle(&mut rand::rng());

    for id in order {
        let bytes = encode_response(&RpcResponse::success(id, json!(format!("0x{id:x}")))).unwrap();
        assert!(table.dispatch_response(&bytes).unwrap());
    }

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 64);
    let seen: HashSet<u16> = received.iter().map(|(id, _)| *id).collect();
    assert_eq!(seen.len(), 64);
    for (id, value) in received.iter() {
        assert_eq!(*value, json!(format!("0x{id:x}")));
    }
}

#[test]
fn close_all_wins_over_later_expiry() {
    let table = CorrelationTable::new();
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let now = Instant::now();

    for id in 0..3u16 {
        let outcomes = outcomes.clone();
        table
            .register(id, now, Box::new(move |outcome| outcomes.lock().unwrap().push(outcome)))
            .unwrap();
    }

    assert_eq!(table.close_all(), 3);
    assert_eq!(table.expire(now + Duration::from_secs(1)), 0);

    let outcomes = outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(
        outcomes
            .iter()
            .all(|outcome| matches!(outcome, Err(RpcCallError::ConnectionClosed)))
    );
}
