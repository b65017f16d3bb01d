//! The [`SharedInstance`] access trait and the double-checked
//! [`LazySharedInstance`] wrapper.

use std::convert::Infallible;
use std::fmt;
use std::sync::LazyLock;

use crate::double_checked::DoubleCheckedCell;
use crate::state::{InitState, Strategy};

/// Uniform read access to a process-wide instance, whatever strategy builds
/// it.
///
/// Every call on the same value returns a reference to the same instance.
pub trait SharedInstance {
    /// The type of the shared instance.
    type Target: ?Sized;

    /// Return the shared instance, constructing it first if necessary.
    fn get_instance(&self) -> &Self::Target;

    /// The strategy used to build the instance.
    fn strategy(&self) -> Strategy;
}

impl<T, F: FnOnce() -> T> SharedInstance for LazyLock<T, F> {
    type Target = T;

    fn get_instance(&self) -> &T {
        self
    }

    fn strategy(&self) -> Strategy {
        Strategy::Lazy
    }
}

enum Init<T, E> {
    Infallible(fn() -> T),
    Fallible(fn() -> Result<T, E>),
}

/// A [`DoubleCheckedCell`] bundled with the function that builds its value.
///
/// With the default `E = Infallible` the wrapper implements
/// [`SharedInstance`].  A fallible initializer is declared with
/// [`LazySharedInstance::fallible`] and read through
/// [`try_get_instance`][Self::try_get_instance].
///
/// # Example
/// ```
/// use sk_singleton::{LazySharedInstance, SharedInstance};
///
/// struct Registry { names: Vec<&'static str> }
///
/// static REGISTRY: LazySharedInstance<Registry> =
///     LazySharedInstance::new(|| Registry { names: vec!["alpha"] });
///
/// assert_eq!(REGISTRY.get_instance().names, ["alpha"]);
/// assert!(REGISTRY.is_initialized());
/// ```
pub struct LazySharedInstance<T, E = Infallible> {
    cell: DoubleCheckedCell<T>,
    init: Init<T, E>,
}

impl<T> LazySharedInstance<T, Infallible> {
    /// Declare an instance built by `init` on first access.
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            cell: DoubleCheckedCell::new(),
            init: Init::Infallible(init),
        }
    }
}

impl<T, E> LazySharedInstance<T, E> {
    /// Declare an instance whose initializer may fail.
    ///
    /// A failure is handed to the caller that triggered construction and the
    /// instance stays uninitialised; the next access tries again.
    pub const fn fallible(init: fn() -> Result<T, E>) -> Self {
        Self {
            cell: DoubleCheckedCell::new(),
            init: Init::Fallible(init),
        }
    }

    /// Return the shared instance, or the initializer's error.
    pub fn try_get_instance(&self) -> Result<&T, E> {
        match self.init {
            Init::Infallible(f) => self.cell.get_or_try_init(|| Ok(f())),
            Init::Fallible(f) => self.cell.get_or_try_init(f),
        }
    }

    /// Return the instance only if it is already built.  Never blocks.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// `true` once the instance is published.
    pub fn is_initialized(&self) -> bool {
        self.cell.is_initialized()
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> InitState {
        self.cell.state()
    }
}

impl<T> SharedInstance for LazySharedInstance<T, Infallible> {
    type Target = T;

    fn get_instance(&self) -> &T {
        match self.try_get_instance() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::DoubleChecked
    }
}

impl<T: fmt::Debug, E> fmt::Debug for LazySharedInstance<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySharedInstance")
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}
