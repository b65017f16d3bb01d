//! Construction failures reach the caller unchanged and leave the instance
//! uninitialised so a later call can try again.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

use singleton_kit::singleton::{DoubleCheckedCell, InitState, LazySharedInstance};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConnectError {
    Refused { attempt: usize },
}

#[derive(Debug)]
struct Connection {
    attempt: usize,
}

static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
static BUILT: AtomicUsize = AtomicUsize::new(0);

static CONNECTION: LazySharedInstance<Connection, ConnectError> =
    LazySharedInstance::fallible(|| {
        let attempt = ATTEMPTS.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            return Err(ConnectError::Refused { attempt });
        }
        BUILT.fetch_add(1, Ordering::SeqCst);
        Ok(Connection { attempt })
    });

#[test]
fn fail_once_then_succeed() {
    assert_eq!(
        CONNECTION.try_get_instance().unwrap_err(),
        ConnectError::Refused { attempt: 0 }
    );
    assert_eq!(CONNECTION.state(), InitState::Uninitialized);
    assert!(CONNECTION.get().is_none());

    let first = CONNECTION.try_get_instance().unwrap();
    let again = CONNECTION.try_get_instance().unwrap();
    assert!(std::ptr::eq(first, again));
    assert_eq!(first.attempt, 1);
    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_callers_after_a_failure() {
    const THREADS: usize = 50;
    let cell: DoubleCheckedCell<Connection> = DoubleCheckedCell::new();
    let attempts = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let results: Vec<Result<usize, ConnectError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cell.get_or_try_init(|| {
                        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                        if attempt == 0 {
                            Err(ConnectError::Refused { attempt })
                        } else {
                            Ok(Connection { attempt })
                        }
                    })
                    .map(|c| c as *const Connection as usize)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let failures: Vec<_> = results.iter().filter(|r| r.is_err()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0], &Err(ConnectError::Refused { attempt: 0 }));

    let successes: Vec<usize> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(successes.len(), THREADS - 1);
    assert!(successes.windows(2).all(|w| w[0] == w[1]));

    // One failed attempt and one successful one; everybody else found the
    // published value on the re-check.
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(cell.get().map(|c| c.attempt), Some(1));
}

#[test]
fn panicking_constructor_is_retried() {
    let cell: DoubleCheckedCell<String> = DoubleCheckedCell::new();
    let outcome = thread::scope(|s| {
        s.spawn(|| cell.get_or_init(|| panic!("first attempt explodes")).len())
            .join()
    });
    assert!(outcome.is_err());
    assert_eq!(cell.state(), InitState::Uninitialized);
    assert_eq!(cell.get_or_init(|| "second".to_string()), "second");
}
