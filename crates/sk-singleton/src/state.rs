//! Lifecycle and strategy descriptors shared by every shared-instance type.

use std::fmt;

/// Where a lazily initialised cell is in its lifecycle.
///
/// ```text
/// Uninitialized ──first caller──▶ Constructing ──ok──▶ Initialized
///       ▲                              │
///       └──────────── err / panic ─────┘
/// ```
///
/// A value returned by `state()` is a snapshot; by the time the caller looks
/// at it another thread may already have moved the cell forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitState {
    /// No instance exists and nobody is building one.
    Uninitialized,
    /// Exactly one thread is running the constructor.
    Constructing,
    /// The instance is published and will never change.
    Initialized,
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitState::Uninitialized => "uninitialized",
            InitState::Constructing => "constructing",
            InitState::Initialized => "initialized",
        };
        f.write_str(s)
    }
}

/// The initialization strategy behind a [`SharedInstance`][crate::SharedInstance].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Built by constant evaluation; no runtime check on the read path.
    Eager,
    /// Acquire-load fast path, mutex plus re-check on the slow path.
    DoubleChecked,
    /// Nested private static, initialised on first access through its holder.
    Holder,
    /// `std::sync::LazyLock`.
    Lazy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Eager => "eager",
            Strategy::DoubleChecked => "double-checked",
            Strategy::Holder => "holder",
            Strategy::Lazy => "lazy",
        };
        f.write_str(s)
    }
}
