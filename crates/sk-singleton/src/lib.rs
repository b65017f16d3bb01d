//! # sk-singleton
//!
//! Lazily created, thread-safe, process-wide instances.
//!
//! Four strategies give the same guarantee (one instance, never observed
//! half-built) with different trade-offs:
//!
//! | strategy | type | read path | construction failure |
//! |----------|------|-----------|----------------------|
//! | eager | [`EagerInstance`] | plain reference | n/a (compile time) |
//! | double-checked | [`DoubleCheckedCell`], [`LazySharedInstance`] | one acquire load | returned to caller, retried next call |
//! | holder | [`HolderInstance`] | `LazyLock` check on the nested static | panic poisons |
//! | lazy | `std::sync::LazyLock` | `LazyLock` check | panic poisons |
//!
//! All of them implement [`SharedInstance`].  Types that should only ever
//! have one instance implement [`Singleton`], usually via
//! [`impl_singleton!`].

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Double-checked locking cell.
pub mod double_checked;

/// Constant-evaluated instances.
pub mod eager;

/// Nested-static holder instances.
pub mod holder;

/// `SharedInstance` trait and `LazySharedInstance`.
pub mod shared;

/// `Singleton` trait and declaration macros.
pub mod singleton;

/// Lifecycle and strategy enums.
pub mod state;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use double_checked::DoubleCheckedCell;
pub use eager::EagerInstance;
pub use holder::HolderInstance;
pub use shared::{LazySharedInstance, SharedInstance};
pub use singleton::{ConstructToken, Singleton};
pub use state::{InitState, Strategy};

/// Re-export of the standard library's lazy cell used by the `lazy` strategy.
pub use std::sync::LazyLock;
