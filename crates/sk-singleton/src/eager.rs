//! Eager static initialization.
//!
//! Rust's one-time setup phase for a `static` is constant evaluation: the
//! initializer runs in the compiler and the finished value is part of the
//! binary image, so it exists before any thread does.  The read path is a
//! plain reference with no check at all.  The cost is that `T` must be
//! buildable by a `const` expression.

use std::fmt;
use std::ops::Deref;

use crate::shared::SharedInstance;
use crate::state::Strategy;

/// A value built during constant evaluation.
///
/// # Example
/// ```
/// use sk_singleton::{EagerInstance, SharedInstance};
///
/// struct Limits { max_connections: u32 }
///
/// static LIMITS: EagerInstance<Limits> =
///     EagerInstance::new(Limits { max_connections: 64 });
///
/// assert_eq!(LIMITS.get_instance().max_connections, 64);
/// ```
pub struct EagerInstance<T> {
    value: T,
}

impl<T> EagerInstance<T> {
    /// Wrap an already built value.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Borrow the instance.
    #[inline]
    pub const fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for EagerInstance<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> SharedInstance for EagerInstance<T> {
    type Target = T;

    fn get_instance(&self) -> &T {
        &self.value
    }

    fn strategy(&self) -> Strategy {
        Strategy::Eager
    }
}

impl<T: fmt::Debug> fmt::Debug for EagerInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EagerInstance").field(&self.value).finish()
    }
}
