//! # sk-ambient
//!
//! Ambient context: process-wide capability references with a sane default
//! that trusted setup code may replace.
//!
//! [`AmbientSlot`] is the generic slot; [`logger`] builds the global logger
//! on top of it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Global logger capability.
pub mod logger;

/// Generic override slot.
pub mod slot;

pub use logger::{
    global_logger, reset_global_logger, seal_global_logger, set_global_logger, DefaultLogger,
    Logger,
};
pub use slot::{AmbientSlot, ScopedOverride};
