//! Type-level singletons declared with `impl_singleton!`.

use std::sync::Barrier;
use std::thread;

use singleton_kit::singleton::Singleton;

mod metrics {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    pub static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    /// Process-wide counters.  The private fields keep struct literals out
    /// of other modules, so `Singleton::instance` is the only way in.
    #[derive(Debug)]
    pub struct Metrics {
        counters: Mutex<Vec<(&'static str, u64)>>,
        serial: usize,
    }

    impl Metrics {
        fn new() -> Self {
            let serial = CONSTRUCTED.fetch_add(1, Ordering::SeqCst) + 1;
            std::thread::yield_now();
            Metrics {
                counters: Mutex::new(Vec::new()),
                serial,
            }
        }

        pub fn serial(&self) -> usize {
            self.serial
        }

        pub fn incr(&self, name: &'static str) {
            let mut counters = self.counters.lock();
            match counters.iter_mut().find(|(n, _)| *n == name) {
                Some((_, v)) => *v += 1,
                None => counters.push((name, 1)),
            }
        }

        pub fn get(&self, name: &str) -> u64 {
            self.counters
                .lock()
                .iter()
                .find(|(n, _)| *n == name)
                .map_or(0, |(_, v)| *v)
        }
    }

    singleton_kit::singleton::impl_singleton!(Metrics => Metrics::new);
}

use metrics::Metrics;

#[test]
fn one_instance_across_threads() {
    const THREADS: usize = 100;
    let barrier = Barrier::new(THREADS);

    let addresses: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let m = Metrics::instance();
                    m.incr("requests");
                    m as *const Metrics as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(
        metrics::CONSTRUCTED.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert_eq!(Metrics::instance().serial(), 1);
    assert_eq!(Metrics::instance().get("requests"), THREADS as u64);
    assert!(Metrics::is_instantiated());
}
