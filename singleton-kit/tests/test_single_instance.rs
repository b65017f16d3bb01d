//! Concurrent first access: every strategy hands all threads the same
//! instance and runs its constructor at most once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, LazyLock};
use std::thread;

use singleton_kit::singleton::{
    define_singleton, EagerInstance, HolderInstance, LazySharedInstance, SharedInstance, Strategy,
};

/// Start `threads` threads at once, each calling `get_instance`, and return
/// the address every thread saw.
fn race<S>(source: &S, threads: usize) -> Vec<usize>
where
    S: SharedInstance + Sync,
    S::Target: Sized,
{
    let barrier = Barrier::new(threads);
    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    source.get_instance() as *const S::Target as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

fn all_equal(addresses: &[usize]) -> bool {
    addresses.windows(2).all(|w| w[0] == w[1])
}

// ─── Double-checked ──────────────────────────────────────────────────────────

static DC_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct Service {
    id: usize,
}

static SERVICE: LazySharedInstance<Service> = LazySharedInstance::new(|| {
    let id = DC_CALLS.fetch_add(1, Ordering::SeqCst) + 1;
    thread::yield_now();
    Service { id }
});

#[test]
fn hundred_threads_one_construction() {
    let addresses = race(&SERVICE, 100);
    assert_eq!(addresses.len(), 100);
    assert!(all_equal(&addresses));
    assert_eq!(DC_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(SERVICE.get_instance().id, 1);
    assert_eq!(SERVICE.strategy(), Strategy::DoubleChecked);
}

static STRESS_CALLS: AtomicUsize = AtomicUsize::new(0);
static STRESS: LazySharedInstance<Vec<u64>> = LazySharedInstance::new(|| {
    STRESS_CALLS.fetch_add(1, Ordering::SeqCst);
    thread::sleep(std::time::Duration::from_millis(5));
    (0..1024).collect()
});

#[test]
fn stress_several_hundred_threads() {
    let addresses = race(&STRESS, 400);
    assert!(all_equal(&addresses));
    assert_eq!(STRESS_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(STRESS.get_instance().len(), 1024);
}

// ─── Holder ──────────────────────────────────────────────────────────────────

static HOLDER_CALLS: AtomicUsize = AtomicUsize::new(0);

fn build_catalog() -> Vec<&'static str> {
    HOLDER_CALLS.fetch_add(1, Ordering::SeqCst);
    thread::yield_now();
    vec!["disk", "net", "gpu"]
}

define_singleton!(holder CATALOG, Vec<&'static str>, build_catalog());

#[test]
fn holder_races_to_one_instance() {
    let addresses = race(&CATALOG, 200);
    assert!(all_equal(&addresses));
    assert_eq!(HOLDER_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(CATALOG.strategy(), Strategy::Holder);
}

#[test]
fn hand_written_holder() {
    static INSTANCE: LazyLock<String> = LazyLock::new(|| "held".to_string());
    static HELD: HolderInstance<String> = HolderInstance::new(&INSTANCE);

    let addresses = race(&HELD, 50);
    assert!(all_equal(&addresses));
    assert_eq!(HELD.get_instance(), "held");
}

// ─── Lazy ────────────────────────────────────────────────────────────────────

static LAZY_CALLS: AtomicUsize = AtomicUsize::new(0);

static TABLE: LazyLock<Vec<u32>> = LazyLock::new(|| {
    LAZY_CALLS.fetch_add(1, Ordering::SeqCst);
    thread::yield_now();
    vec![10, 20, 30]
});

#[test]
fn lazy_races_to_one_instance() {
    let addresses = race(&TABLE, 200);
    assert!(all_equal(&addresses));
    assert_eq!(LAZY_CALLS.load(Ordering::SeqCst), 1);
}

// ─── Eager ───────────────────────────────────────────────────────────────────

struct Limits {
    max_open_files: u32,
}

static LIMITS: EagerInstance<Limits> = EagerInstance::new(Limits {
    max_open_files: 1024,
});

#[test]
fn eager_is_the_same_everywhere() {
    let addresses = race(&LIMITS, 200);
    assert!(all_equal(&addresses));
    assert_eq!(addresses[0], LIMITS.get() as *const Limits as usize);
    assert_eq!(LIMITS.max_open_files, 1024);
}

// ─── Idempotence ─────────────────────────────────────────────────────────────

static REPEAT_CALLS: AtomicUsize = AtomicUsize::new(0);
static REPEAT: LazySharedInstance<u64> = LazySharedInstance::new(|| {
    REPEAT_CALLS.fetch_add(1, Ordering::SeqCst);
    99
});

#[test]
fn repeated_calls_have_no_extra_side_effects() {
    let first = REPEAT.get_instance() as *const u64;
    for _ in 0..10_000 {
        assert_eq!(REPEAT.get_instance() as *const u64, first);
    }
    assert_eq!(REPEAT_CALLS.load(Ordering::SeqCst), 1);
}
