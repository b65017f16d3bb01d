//! # singleton-kit
//!
//! Lazily created, thread-safe, process-wide instances and replaceable
//! ambient capabilities.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `sk-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use singleton_kit::singleton::{LazySharedInstance, SharedInstance};
//!
//! struct Config { workers: usize }
//!
//! static CONFIG: LazySharedInstance<Config> =
//!     LazySharedInstance::new(|| Config { workers: 4 });
//!
//! assert_eq!(CONFIG.get_instance().workers, 4);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Errors, settings, and logging bootstrap.
pub use sk_core as core;

/// Shared-instance strategies and the `Singleton` trait.
pub use sk_singleton as singleton;

/// Ambient-context override slots and the global logger.
pub use sk_ambient as ambient;

/// Convenience re-exports of the most commonly used items.
pub mod prelude {
    pub use sk_ambient::{global_logger, AmbientSlot, Logger};
    pub use sk_core::{Error, Result, Settings};
    pub use sk_singleton::{
        define_singleton, impl_singleton, DoubleCheckedCell, EagerInstance, HolderInstance,
        InitState, LazySharedInstance, SharedInstance, Singleton, Strategy,
    };
}
