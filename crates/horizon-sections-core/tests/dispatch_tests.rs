//! Integration tests for routing signal emissions through the scheduler boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use horizon_sections_core::{
    ManualScheduler, OwnerQueue, Scheduler, Signal, ThreadPoolConfig, ThreadedScheduler,
};
use parking_lot::Mutex;

#[test]
fn test_worker_emission_reaches_slots_on_owner() {
    let scheduler = Arc::new(ThreadedScheduler::new(ThreadPoolConfig::with_threads(4)).unwrap());
    let signal = Arc::new(Signal::<u32>::new());
    let owner = std::thread::current().id();
    let received = Arc::new(Mutex::new(Vec::new()));

    let sink = received.clone();
    signal.connect(move |value| {
        assert_eq!(std::thread::current().id(), owner);
        sink.lock().push(*value);
    });

    for value in 0..32 {
        let (scheduler_ref, signal) = (scheduler.clone(), signal.clone());
        scheduler.run_on_worker(Box::new(move || {
            scheduler_ref.run_on_owner(Box::new(move || {
                signal.emit(value);
            }));
        }));
    }

    scheduler.wait_idle(Duration::from_secs(10)).unwrap();

    let mut received = received.lock().clone();
    received.sort_unstable();
    assert_eq!(received, (0..32).collect::<Vec<_>>());
}

#[test]
fn test_owner_queue_preserves_post_order_across_threads() {
    let queue = OwnerQueue::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let poster = {
        let (queue, log) = (queue.clone(), log.clone());
        std::thread::spawn(move || {
            for n in 0..100 {
                let log = log.clone();
                queue.post(move || log.lock().push(n));
            }
        })
    };
    poster.join().unwrap();

    assert_eq!(queue.process_pending(), 100);
    assert_eq!(*log.lock(), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_blocked_signal_skips_owner_jobs() {
    let scheduler = ManualScheduler::new();
    let signal = Arc::new(Signal::<()>::new());
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    signal.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..3 {
        let signal = signal.clone();
        scheduler.run_on_owner(Box::new(move || {
            signal.emit(());
        }));
    }

    signal.set_blocked(true);
    scheduler.run_owner_jobs();
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    signal.set_blocked(false);
    let signal_ref = signal.clone();
    scheduler.run_on_owner(Box::new(move || {
        signal_ref.emit(());
    }));
    scheduler.run_until_idle();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
