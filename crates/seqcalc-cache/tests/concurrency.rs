//! Concurrency tests for the memoization cache: single-flight
//! semantics, failure fan-out, and waiter cancellation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use num_bigint::BigInt;

use seqcalc_cache::{CacheKey, MemoCache};
use seqcalc_core::ctl::ComputeCtl;
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::metrics::NoOpSink;
use seqcalc_core::solver::SeqError;

fn cache(cap: usize) -> Arc<MemoCache> {
    Arc::new(MemoCache::with_capacity(
        NonZeroUsize::new(cap).unwrap(),
        Arc::new(NoOpSink::new()),
    ))
}

fn fib_key(index: i64) -> CacheKey {
    CacheKey::new(Arc::new(RecurrenceDefinition::fibonacci()), index)
}

#[test]
fn single_flight_one_computation_for_k_callers() {
    const K: usize = 16;

    let cache = cache(8);
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(K));

    let handles: Vec<_> = (0..K)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                cache.get_or_compute(fib_key(42), &ComputeCtl::unbounded(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // Hold the flight open long enough for others to join.
                    std::thread::sleep(Duration::from_millis(50));
                    Ok(BigInt::from(267_914_296u64))
                })
            })
        })
        .collect();

    let results: Vec<BigInt> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one computation");
    for value in &results {
        assert_eq!(value, &BigInt::from(267_914_296u64));
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn failure_fans_out_to_all_waiters_and_is_not_cached() {
    const K: usize = 8;

    let cache = cache(8);
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(K));

    let handles: Vec<_> = (0..K)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                cache.get_or_compute(fib_key(7), &ComputeCtl::unbounded(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(50));
                    Err(SeqError::Computation("injected fault".into()))
                })
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(SeqError::Computation(_))));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!cache.contains(&fib_key(7)));

    // A later request gets a fresh attempt that can succeed.
    let value = cache
        .get_or_compute(fib_key(7), &ComputeCtl::unbounded(), || {
            Ok(BigInt::from(13))
        })
        .unwrap();
    assert_eq!(value, BigInt::from(13));
}

#[test]
fn cancelled_joiner_does_not_cancel_the_flight() {
    let cache = cache(8);
    let started = Arc::new(Barrier::new(2));

    // Leader: slow computation.
    let leader = {
        let cache = Arc::clone(&cache);
        let started = Arc::clone(&started);
        std::thread::spawn(move || {
            cache.get_or_compute(fib_key(21), &ComputeCtl::unbounded(), || {
                started.wait();
                std::thread::sleep(Duration::from_millis(100));
                Ok(BigInt::from(10_946))
            })
        })
    };

    started.wait();

    // Joiner with an already-cancelled control gives up immediately.
    let ctl = ComputeCtl::unbounded();
    ctl.token().cancel();
    let joined = cache.get_or_compute(fib_key(21), &ctl, || {
        unreachable!("a pending flight exists; this caller must join it")
    });
    assert!(matches!(joined, Err(SeqError::Cancelled)));

    // The shared computation still completes and populates the cache.
    let value = leader.join().unwrap().unwrap();
    assert_eq!(value, BigInt::from(10_946));
    assert!(cache.contains(&fib_key(21)));
}

#[test]
fn joiner_timeout_leaves_cache_intact() {
    let cache = cache(8);
    let started = Arc::new(Barrier::new(2));

    let leader = {
        let cache = Arc::clone(&cache);
        let started = Arc::clone(&started);
        std::thread::spawn(move || {
            cache.get_or_compute(fib_key(30), &ComputeCtl::unbounded(), || {
                started.wait();
                std::thread::sleep(Duration::from_millis(150));
                Ok(BigInt::from(832_040))
            })
        })
    };

    started.wait();
    let impatient = ComputeCtl::with_timeout(Duration::from_millis(10));
    let joined = cache.get_or_compute(fib_key(30), &impatient, || {
        unreachable!("a pending flight exists; this caller must join it")
    });
    assert!(matches!(joined, Err(SeqError::Timeout(_))));

    assert_eq!(leader.join().unwrap().unwrap(), BigInt::from(832_040));
    assert_eq!(cache.get(&fib_key(30)).unwrap().value, BigInt::from(832_040));
}

#[test]
fn independent_keys_do_not_serialize() {
    const K: usize = 8;

    let cache = cache(K);
    let barrier = Arc::new(Barrier::new(K));

    let handles: Vec<_> = (0..K)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                let index = i64::try_from(i).unwrap();
                cache.get_or_compute(fib_key(index), &ComputeCtl::unbounded(), || {
                    Ok(BigInt::from(index))
                })
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let value = handle.join().unwrap().unwrap();
        assert_eq!(value, BigInt::from(i64::try_from(i).unwrap()));
    }
    assert_eq!(cache.len(), K);
}
