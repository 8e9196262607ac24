//! Multi-thread uniqueness and ordering properties (spec.md §8, P1/P6,
//! scenarios 5-6).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use nonce_core::{init, nonce, sortable_nonce, FactoryOpts};

#[test]
fn concurrent_counter_nonces_are_unique_across_all_cpus() {
    init(FactoryOpts::new(0).with_name("concurrency-counter")).unwrap();

    // Fan out to one thread per logical CPU (at least 4, so the test still
    // exercises real contention on single-core CI runners) rather than a
    // fixed thread count, so the test scales with the machine it runs on.
    let thread_count = num_cpus::get().max(4);
    const PER_THREAD: usize = 100_000;

    let seen: Arc<Mutex<HashSet<Vec<u8>>>> = Arc::new(Mutex::new(HashSet::new()));
    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                let mut local = Vec::with_capacity(PER_THREAD);
                for _ in 0..PER_THREAD {
                    local.push(nonce("concurrency-counter", 96).unwrap());
                }
                let mut guard = seen.lock().unwrap();
                guard.extend(local);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(seen.lock().unwrap().len(), thread_count * PER_THREAD);
}

#[test]
fn sixteen_threads_sortable_nonces_are_unique_and_locally_ordered() {
    init(FactoryOpts::new(0).with_name("concurrency-sortable")).unwrap();

    let seen: Arc<Mutex<HashSet<Vec<u8>>>> = Arc::new(Mutex::new(HashSet::new()));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                let mut local = Vec::with_capacity(10_000);
                for _ in 0..10_000 {
                    local.push(sortable_nonce("concurrency-sortable", 64).unwrap());
                }
                // Within a thread's own sequence, the 42-bit timestamp
                // prefix must be non-decreasing (P6, bytewise for w=64
                // since the prefix occupies the top bits of the word).
                for pair in local.windows(2) {
                    assert!(pair[1] >= pair[0]);
                }
                let mut guard = seen.lock().unwrap();
                guard.extend(local);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(seen.lock().unwrap().len(), 160_000);
}

#[test]
fn encrypted_nonces_stay_unique_under_concurrency() {
    init(
        FactoryOpts::new(0)
            .with_name("concurrency-encrypted")
            .with_cipher64(nonce_core::CipherConfig::new(
                nonce_core::CipherChoice::Blowfish,
            ))
            .with_base_key(vec![0x5Au8; 32]),
    )
    .unwrap();

    let seen: Arc<Mutex<HashSet<Vec<u8>>>> = Arc::new(Mutex::new(HashSet::new()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                let mut local = Vec::with_capacity(2_000);
                for _ in 0..2_000 {
                    local.push(
                        nonce_core::encrypted_nonce(
                            "concurrency-encrypted",
                            64,
                            nonce_core::NonceBase::Counter,
                        )
                        .unwrap(),
                    );
                }
                let mut guard = seen.lock().unwrap();
                guard.extend(local);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(seen.lock().unwrap().len(), 16_000);
}
