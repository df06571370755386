use memocache::cache;
use std::sync::atomic::{AtomicUsize, Ordering};

/// (1,2), (3,4), (5,6), then (1,2) again: the first entry was evicted and is
/// recomputed, leaving (5,6) and (1,2)
#[test]
fn test_lru_scenario() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(policy = "lru", maxsize = 2)]
    fn add(a: i32, b: i32) -> i32 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        a + b
    }

    assert_eq!(add(1, 2), 3);
    assert_eq!(add(3, 4), 7);
    assert_eq!(add(5, 6), 11);
    assert_eq!(add(1, 2), 3);
    assert_eq!(CALLS.load(Ordering::SeqCst), 4);

    // both survivors are hits
    assert_eq!(add(5, 6), 11);
    assert_eq!(add(1, 2), 3);
    assert_eq!(CALLS.load(Ordering::SeqCst), 4);

    // (3, 4) was evicted
    assert_eq!(add(3, 4), 7);
    assert_eq!(CALLS.load(Ordering::SeqCst), 5);
}

/// A hit refreshes recency
#[test]
fn test_lru_hit_protects_entry() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(policy = "lru", maxsize = 2)]
    fn double(x: i32) -> i32 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x * 2
    }

    double(1);
    double(2);
    double(1); // 2 is now least recent
    double(3); // evicts 2
    assert_eq!(CALLS.load(Ordering::SeqCst), 3);

    double(1);
    assert_eq!(CALLS.load(Ordering::SeqCst), 3);
    double(2);
    assert_eq!(CALLS.load(Ordering::SeqCst), 4);
}

/// Positional order is part of the key
#[test]
fn test_lru_argument_order() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(policy = "lru", maxsize = 8)]
    fn concat(a: &str, b: &str) -> String {
        CALLS.fetch_add(1, Ordering::SeqCst);
        format!("{}{}", a, b)
    }

    assert_eq!(concat("a", "b"), "ab");
    assert_eq!(concat("b", "a"), "ba");
    assert_eq!(concat("a", "b"), "ab");
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}

/// Capacity of one behaves as a single-slot cache
#[test]
fn test_lru_capacity_one() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(policy = "lru", maxsize = 1)]
    fn ident(x: u64) -> u64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x
    }

    ident(1);
    ident(1);
    ident(2);
    ident(1);
    assert_eq!(CALLS.load(Ordering::SeqCst), 3);
}

/// Shared across threads: every thread sees the same store
#[test]
fn test_lru_shared_between_threads() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[cache(policy = "lru", maxsize = 16)]
    fn cube(x: u64) -> u64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        x * x * x
    }

    assert_eq!(cube(3), 27);

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| cube(3)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 27);
    }
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}
