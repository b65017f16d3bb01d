//! Error types for singleton-kit.
//!
//! Configuration and bootstrap failures are collected in a single
//! `thiserror`-derived enum.  Errors raised by a singleton's own constructor
//! are *not* routed through this type: they reach the caller unchanged, as
//! whatever error type the constructor returns.

use thiserror::Error;

/// The top-level error type for settings, logging and ambient slots.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A configuration document or value could not be accepted.
    #[error("configuration error: {0}")]
    Config(String),

    /// A global `tracing` subscriber has already been installed.
    #[error("logging already installed")]
    LoggingAlreadyInstalled,
}

/// Shorthand `Result` type used throughout singleton-kit.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use sk_core::{ensure, errors::Error};
/// fn non_empty(s: &str) -> sk_core::errors::Result<&str> {
///     ensure!(!s.is_empty(), "value must not be empty");
///     Ok(s)
/// }
/// assert!(non_empty("info").is_ok());
/// assert_eq!(
///     non_empty(""),
///     Err(Error::Precondition("value must not be empty".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
