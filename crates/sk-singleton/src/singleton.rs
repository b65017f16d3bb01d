//! Type-level singletons and the declaration macros.
//!
//! A type becomes a singleton by implementing [`Singleton`]: it names the
//! constructor the machinery may call and the private static cell that holds
//! its only instance.  [`impl_singleton!`] writes that impl.
//!
//! The constructor receives a [`ConstructToken`], which only this crate can
//! create, so code outside the cell cannot call
//! [`Singleton::construct`] to make a second instance.  Keeping at least one
//! private field on the payload type closes the remaining path (a struct
//! literal outside its module).

use crate::double_checked::DoubleCheckedCell;

/// Proof that a call to [`Singleton::construct`] comes from the cell.
///
/// It has no public constructor, so outside code cannot build a second
/// instance:
///
/// ```compile_fail
/// mod registry {
///     pub struct Registry { _sealed: () }
///     impl Registry {
///         fn new() -> Self { Registry { _sealed: () } }
///     }
///     sk_singleton::impl_singleton!(Registry => Registry::new);
/// }
///
/// use sk_singleton::{ConstructToken, Singleton};
///
/// let second = registry::Registry::construct(ConstructToken { _private: () });
/// ```
#[derive(Debug)]
pub struct ConstructToken {
    _private: (),
}

/// A type with exactly one process-wide instance.
///
/// # Example
/// ```
/// mod registry {
///     pub struct Registry {
///         names: Vec<&'static str>,
///     }
///
///     impl Registry {
///         fn new() -> Self {
///             Registry { names: vec!["alpha", "beta"] }
///         }
///
///         pub fn names(&self) -> &[&'static str] {
///             &self.names
///         }
///     }
///
///     sk_singleton::impl_singleton!(Registry => Registry::new);
/// }
///
/// use sk_singleton::Singleton;
/// use registry::Registry;
///
/// assert_eq!(Registry::instance().names(), ["alpha", "beta"]);
/// assert!(std::ptr::eq(Registry::instance(), Registry::instance()));
/// ```
pub trait Singleton: Sized + Send + Sync + 'static {
    /// Build the instance.  Only reachable with a token minted by the cell.
    fn construct(token: ConstructToken) -> Self;

    /// The static cell that holds the instance.
    fn cell() -> &'static DoubleCheckedCell<Self>;

    /// Return the instance, constructing it on first call.
    fn instance() -> &'static Self {
        Self::cell().get_or_init(|| Self::construct(ConstructToken { _private: () }))
    }

    /// `true` once the instance exists.
    fn is_instantiated() -> bool {
        Self::cell().is_initialized()
    }
}

/// Implement [`Singleton`] for a type, backed by a private
/// [`DoubleCheckedCell`].
///
/// The second argument is a path to a zero-argument constructor; it may be
/// private to the invoking module.
#[macro_export]
macro_rules! impl_singleton {
    ($ty:ty => $ctor:path) => {
        impl $crate::Singleton for $ty {
            fn construct(_token: $crate::ConstructToken) -> Self {
                $ctor()
            }

            fn cell() -> &'static $crate::DoubleCheckedCell<Self> {
                static CELL: $crate::DoubleCheckedCell<$ty> = $crate::DoubleCheckedCell::new();
                &CELL
            }
        }
    };
}

/// Declare a process-wide instance as a `static`.
///
/// The optional leading keyword picks the initialization strategy:
///
/// | keyword          | static type                                   |
/// |------------------|-----------------------------------------------|
/// | *(none)*, `lazy` | `std::sync::LazyLock<T>`                      |
/// | `eager`          | [`EagerInstance<T>`][crate::EagerInstance] (`$init` must be `const`) |
/// | `double_checked` | [`LazySharedInstance<T>`][crate::LazySharedInstance] |
/// | `holder`         | [`HolderInstance<T>`][crate::HolderInstance]  |
///
/// # Example
/// ```
/// use sk_singleton::{define_singleton, SharedInstance};
///
/// struct Registry { data: Vec<String> }
/// define_singleton!(REGISTRY, Registry, Registry { data: Vec::new() });
/// define_singleton!(eager LIMIT, u32, 16);
/// define_singleton!(double_checked NAMES, Vec<&'static str>, vec!["a", "b"]);
/// define_singleton!(holder PRIMES, Vec<u32>, vec![2, 3, 5]);
///
/// assert!(REGISTRY.data.is_empty());
/// assert_eq!(*LIMIT.get_instance(), 16);
/// assert_eq!(NAMES.get_instance().len(), 2);
/// assert_eq!(PRIMES.get_instance()[2], 5);
/// ```
#[macro_export]
macro_rules! define_singleton {
    (eager $vis:vis $name:ident, $ty:ty, $init:expr) => {
        /// Eagerly built global singleton.
        $vis static $name: $crate::EagerInstance<$ty> = $crate::EagerInstance::new($init);
    };
    (double_checked $vis:vis $name:ident, $ty:ty, $init:expr) => {
        /// Global singleton built by double-checked locking.
        $vis static $name: $crate::LazySharedInstance<$ty> =
            $crate::LazySharedInstance::new(|| $init);
    };
    (holder $vis:vis $name:ident, $ty:ty, $init:expr) => {
        /// Global singleton kept in a nested holder static.
        $vis static $name: $crate::HolderInstance<$ty> = $crate::HolderInstance::new({
            static INSTANCE: ::std::sync::LazyLock<$ty> = ::std::sync::LazyLock::new(|| $init);
            &INSTANCE
        });
    };
    (lazy $vis:vis $name:ident, $ty:ty, $init:expr) => {
        $crate::define_singleton!($vis $name, $ty, $init);
    };
    ($vis:vis $name:ident, $ty:ty, $init:expr) => {
        /// Lazily-initialised global singleton.
        $vis static $name: ::std::sync::LazyLock<$ty> = ::std::sync::LazyLock::new(|| $init);
    };
}
