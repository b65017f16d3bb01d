//! `AmbientSlot<C>`: a process-wide, replaceable capability reference.
//!
//! Unlike the strict singletons in `sk-singleton`, a slot may be re-pointed:
//! trusted setup code installs an override with [`AmbientSlot::set`] and
//! every later [`AmbientSlot::get`] returns it.  Until then `get` returns a
//! built-in default, created on first use and cached for the life of the
//! slot.
//!
//! | operation | effect |
//! |-----------|--------|
//! | `get` | current override, else the cached default |
//! | `set` | replace the override (last writer wins) |
//! | `reset` | administrative reset back to the default |
//! | `seal` | refuse any further `set` / `reset` |
//! | `scoped` | override until the returned guard drops |

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{const_rwlock, RwLock};
use sk_core::{ensure, Result};
use sk_singleton::DoubleCheckedCell;
use tracing::debug;

/// A replaceable process-wide reference to a capability `C`.
///
/// `C` is usually a trait object such as `dyn Logger`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sk_ambient::AmbientSlot;
///
/// trait Clock: Send + Sync { fn now(&self) -> u64; }
/// struct SystemClock;
/// impl Clock for SystemClock { fn now(&self) -> u64 { 1 } }
/// struct FixedClock(u64);
/// impl Clock for FixedClock { fn now(&self) -> u64 { self.0 } }
///
/// fn system_clock() -> Arc<dyn Clock> { Arc::new(SystemClock) }
///
/// static CLOCK: AmbientSlot<dyn Clock> = AmbientSlot::new(system_clock);
///
/// assert_eq!(CLOCK.get().now(), 1);
/// CLOCK.set(Arc::new(FixedClock(42))).unwrap();
/// assert_eq!(CLOCK.get().now(), 42);
/// ```
pub struct AmbientSlot<C: ?Sized + 'static> {
    current: RwLock<Option<Arc<C>>>,
    default: DoubleCheckedCell<Arc<C>>,
    make_default: fn() -> Arc<C>,
    sealed: AtomicBool,
}

impl<C: ?Sized + Send + Sync + 'static> AmbientSlot<C> {
    /// Create a slot whose default is built by `make_default` on first use.
    pub const fn new(make_default: fn() -> Arc<C>) -> Self {
        Self {
            current: const_rwlock(None),
            default: DoubleCheckedCell::new(),
            make_default,
            sealed: AtomicBool::new(false),
        }
    }

    /// The current capability: the override if one is set, else the default.
    pub fn get(&self) -> Arc<C> {
        if let Some(value) = self.current.read().as_ref() {
            return Arc::clone(value);
        }
        self.default_value()
    }

    /// The built-in default, whether or not an override is in place.
    pub fn default_value(&self) -> Arc<C> {
        Arc::clone(self.default.get_or_init(self.make_default))
    }

    /// `true` while an override is installed.
    pub fn is_overridden(&self) -> bool {
        self.current.read().is_some()
    }

    /// Install `value` as the current capability.
    ///
    /// Returns the previous override, if any.  Fails with
    /// [`Error::Precondition`][sk_core::Error::Precondition] once the slot is
    /// sealed.
    pub fn set(&self, value: Arc<C>) -> Result<Option<Arc<C>>> {
        self.ensure_open()?;
        debug!(capability = std::any::type_name::<C>(), "ambient override installed");
        Ok(self.current.write().replace(value))
    }

    /// Remove any override so that [`get`][Self::get] returns the default.
    ///
    /// Returns the removed override.  Fails once the slot is sealed.
    pub fn reset(&self) -> Result<Option<Arc<C>>> {
        self.ensure_open()?;
        debug!(capability = std::any::type_name::<C>(), "ambient override reset");
        Ok(self.current.write().take())
    }

    /// Freeze the current value.  Later `set`/`reset` calls fail.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// `true` after [`seal`][Self::seal].
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Install `value` until the returned guard is dropped, then restore
    /// whatever was installed before.
    ///
    /// Meant for tests; overlapping scopes on different threads restore in
    /// drop order, not in a stack discipline.
    pub fn scoped(&self, value: Arc<C>) -> Result<ScopedOverride<'_, C>> {
        let previous = self.set(value)?;
        Ok(ScopedOverride {
            slot: self,
            previous,
        })
    }

    fn ensure_open(&self) -> Result<()> {
        ensure!(
            !self.is_sealed(),
            "ambient slot for {} is sealed",
            std::any::type_name::<C>()
        );
        Ok(())
    }
}

impl<C: ?Sized + 'static> fmt::Debug for AmbientSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientSlot")
            .field("capability", &std::any::type_name::<C>())
            .field("overridden", &self.current.read().is_some())
            .field("sealed", &self.sealed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Guard returned by [`AmbientSlot::scoped`].
///
/// Restores the previous override on drop, even if the slot was sealed in
/// the meantime.
#[must_use = "the override is removed as soon as the guard is dropped"]
pub struct ScopedOverride<'a, C: ?Sized + 'static> {
    slot: &'a AmbientSlot<C>,
    previous: Option<Arc<C>>,
}

impl<C: ?Sized + 'static> Drop for ScopedOverride<'_, C> {
    fn drop(&mut self) {
        *self.slot.current.write() = self.previous.take();
    }
}
