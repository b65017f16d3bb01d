//! Holder-indirection initialization.
//!
//! The instance lives in a private `static` nested inside the initializer
//! block of the outer static.  Nothing else can name that static, so its
//! one-time setup runs exactly when the outer value is first read.  The
//! standard library's `LazyLock` guarantees it runs at most once and
//! completes before any read.
//! User code carries no lock and no second check.
//!
//! The outer [`HolderInstance`] keeps a reference to that nested static,
//! so it is a `const` value that costs nothing until used, and every read
//! goes through the one `LazyLock`.  Declare one with
//! [`define_singleton!`][crate::define_singleton] and the `holder` keyword.
//!
//! If the initializer panics, `LazyLock` poisons: every later access panics
//! too.  Use [`LazySharedInstance`][crate::LazySharedInstance] when
//! construction can fail and must be retried.

use std::fmt;
use std::sync::LazyLock;

use crate::shared::SharedInstance;
use crate::state::Strategy;

/// Access point for an instance kept in a nested holder static.
///
/// Only a `&'static LazyLock<T>` is accepted, so an accessor that builds a
/// fresh value per call cannot be wrapped:
///
/// ```compile_fail
/// use sk_singleton::HolderInstance;
///
/// fn leaky() -> &'static u32 {
///     Box::leak(Box::new(7))
/// }
///
/// static NOT_SHARED: HolderInstance<u32> = HolderInstance::new(leaky);
/// ```
pub struct HolderInstance<T: 'static> {
    holder: &'static LazyLock<T>,
}

impl<T: 'static> HolderInstance<T> {
    /// Wrap the nested holder static.
    pub const fn new(holder: &'static LazyLock<T>) -> Self {
        Self { holder }
    }

    /// Borrow the instance, triggering the holder's setup on first call.
    #[inline]
    pub fn get(&self) -> &'static T {
        LazyLock::force(self.holder)
    }
}

impl<T: 'static> SharedInstance for HolderInstance<T> {
    type Target = T;

    fn get_instance(&self) -> &T {
        self.get()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Holder
    }
}

impl<T: 'static> fmt::Debug for HolderInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HolderInstance").finish_non_exhaustive()
    }
}
