//! Double-checked lazy initialization.
//!
//! [`DoubleCheckedCell`] publishes a heap-allocated value through an
//! `AtomicPtr`.  The read path is a single acquire load.  Only when the
//! pointer is still null does a caller take the construction mutex, look at
//! the pointer again, and, if it is still null, run the constructor and
//! publish the result with a release store.
//!
//! * The outer check keeps the mutex off the read path once initialised.
//! * The inner check stops a second thread that lost the race for the mutex
//!   from constructing again.
//! * The release/acquire pair means any thread that sees a non-null pointer
//!   also sees every write the constructor made.
//!
//! A constructor that returns `Err` or panics publishes nothing, so the next
//! caller retries.  `parking_lot` mutexes are not poisoned by a panic.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::{const_mutex, Mutex};
use sk_core::Settings;
use tracing::{debug, warn};

use crate::state::InitState;

/// A write-once cell built on double-checked locking.
///
/// Usable as a `static` (it has a `const` constructor) or as an owned value.
///
/// # Panics
///
/// A constructor that calls back into its own cell on the same thread
/// panics instead of deadlocking on the construction mutex.  The cell is left
/// uninitialised.  The same applies to
/// [`LazySharedInstance`][crate::LazySharedInstance] and
/// [`Singleton::instance`][crate::Singleton::instance], which are built on
/// this cell.
///
/// # Example
/// ```
/// use sk_singleton::DoubleCheckedCell;
///
/// static GREETING: DoubleCheckedCell<String> = DoubleCheckedCell::new();
///
/// let a = GREETING.get_or_init(|| "hello".to_string());
/// let b = GREETING.get_or_init(|| unreachable!());
/// assert!(std::ptr::eq(a, b));
/// ```
pub struct DoubleCheckedCell<T> {
    value: AtomicPtr<T>,
    builder: Mutex<Option<ThreadId>>,
    lock: Mutex<()>,
    _owns: PhantomData<T>,
}

// SAFETY: the cell hands out `&T` to any thread (needs `T: Sync`) and the
// value may be constructed on one thread and dropped on another (needs
// `T: Send`).
unsafe impl<T: Send + Sync> Sync for DoubleCheckedCell<T> {}
// SAFETY: moving the cell moves ownership of the boxed `T`.
unsafe impl<T: Send> Send for DoubleCheckedCell<T> {}

impl<T> DoubleCheckedCell<T> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
            builder: const_mutex(None),
            lock: const_mutex(()),
            _owns: PhantomData,
        }
    }

    /// Create a cell that is already initialised with `value`.
    pub fn with_value(value: T) -> Self {
        Self {
            value: AtomicPtr::new(Box::into_raw(Box::new(value))),
            builder: const_mutex(None),
            lock: const_mutex(()),
            _owns: PhantomData,
        }
    }

    /// Return the value if it has been published.  Never blocks.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        let ptr = self.value.load(Ordering::Acquire);
        // SAFETY: a non-null pointer was produced by `Box::into_raw` after the
        // value was fully written and stored with `Release`, which our
        // `Acquire` load synchronises with.  It is only freed through
        // `&mut self`, so it outlives this borrow.
        unsafe { ptr.as_ref() }
    }

    /// `true` once the value is published.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.value.load(Ordering::Acquire).is_null()
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> InitState {
        if self.is_initialized() {
            InitState::Initialized
        } else if self.builder.lock().is_some() {
            InitState::Constructing
        } else {
            InitState::Uninitialized
        }
    }

    /// Return the value, running `f` to build it if nobody has yet.
    ///
    /// If several threads arrive before initialisation, exactly one runs `f`
    /// and the rest block until it finishes.
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Return the value, running the fallible `f` to build it if needed.
    ///
    /// An `Err` from `f` is returned unchanged to the thread that ran it and
    /// the cell stays uninitialised, so a later call runs its own `f`.
    /// Threads that were waiting on the mutex re-check and, finding the cell
    /// still empty, try their own constructor.
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        self.initialize(f)
    }

    #[cold]
    fn initialize<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let current = thread::current().id();
        if *self.builder.lock() == Some(current) {
            panic!(
                "re-entrant initialization of {}: the constructor called back into its own cell",
                type_name::<T>()
            );
        }

        let _guard = self.lock.lock();
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let traced = Settings::instance().trace_initialization();
        if traced {
            debug!(ty = type_name::<T>(), "constructing shared instance");
        }

        let flag = BuilderMark::set(&self.builder, current);
        let result = f();
        match result {
            Ok(value) => {
                let ptr = Box::into_raw(Box::new(value));
                self.value.store(ptr, Ordering::Release);
                drop(flag);
                if traced {
                    debug!(ty = type_name::<T>(), "shared instance published");
                }
                // SAFETY: `ptr` came from `Box::into_raw` just above and is
                // owned by `self` from now on.
                Ok(unsafe { &*ptr })
            }
            Err(err) => {
                drop(flag);
                if traced {
                    warn!(
                        ty = type_name::<T>(),
                        "shared instance construction failed; cell left uninitialized"
                    );
                }
                Err(err)
            }
        }
    }

    /// Mutable access to the value.  Requires exclusive access to the cell.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        let ptr = *self.value.get_mut();
        // SAFETY: exclusive borrow of the cell; the pointer is either null or
        // a live box owned by the cell.
        unsafe { ptr.as_mut() }
    }

    /// Take the value out, leaving the cell uninitialised.
    ///
    /// Requires exclusive access, so no reader can be holding a reference.
    pub fn take(&mut self) -> Option<T> {
        let ptr = std::mem::replace(self.value.get_mut(), ptr::null_mut());
        if ptr.is_null() {
            None
        } else {
            // SAFETY: non-null pointers in the cell always come from
            // `Box::into_raw`, and we just removed the only copy.
            Some(*unsafe { Box::from_raw(ptr) })
        }
    }

    /// Consume the cell and return the value, if any.
    pub fn into_inner(mut self) -> Option<T> {
        self.take()
    }
}

impl<T> Drop for DoubleCheckedCell<T> {
    fn drop(&mut self) {
        drop(self.take());
    }
}

impl<T> Default for DoubleCheckedCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for DoubleCheckedCell<T> {
    fn from(value: T) -> Self {
        Self::with_value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for DoubleCheckedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_tuple("DoubleCheckedCell").field(v).finish(),
            None => write!(f, "DoubleCheckedCell(<{}>)", self.state()),
        }
    }
}

/// Records the constructing thread for as long as it is alive, including
/// while unwinding out of a panicking constructor.
struct BuilderMark<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> BuilderMark<'a> {
    fn set(slot: &'a Mutex<Option<ThreadId>>, builder: ThreadId) -> Self {
        *slot.lock() = Some(builder);
        Self(slot)
    }
}

impl Drop for BuilderMark<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}
