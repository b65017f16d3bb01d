//! # sk-core
//!
//! Shared foundations for the singleton-kit crates: the error type and its
//! `ensure!` macro, process-wide [`Settings`], and the optional
//! logging bootstrap.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

/// `tracing-subscriber` installation.
pub mod logging;

/// Global settings (log filter, construction tracing).
pub mod settings;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::{Settings, SettingsConfig};
