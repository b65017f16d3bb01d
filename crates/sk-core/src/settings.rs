//! Process-wide settings for singleton-kit.
//!
//! [`Settings`] is itself a lazily created singleton reached through
//! [`Settings::instance`].  It holds the default log filter directive used by
//! [`logging::install`][crate::logging::install] and a switch controlling
//! whether lazy cells emit `tracing` events while constructing their value.
//!
//! Values can be changed from any thread, or loaded in one go from a TOML
//! document through [`SettingsConfig`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::errors::{Error, Result};

/// Filter directive used when neither `RUST_LOG` nor the settings override it.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Process-wide settings used by the singleton-kit crates.
#[derive(Debug)]
pub struct Settings {
    log_filter: Mutex<String>,
    trace_initialization: AtomicBool,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    pub(crate) fn new() -> Self {
        Self {
            log_filter: Mutex::new(DEFAULT_LOG_FILTER.to_string()),
            trace_initialization: AtomicBool::new(true),
        }
    }

    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(Settings::new)
    }

    /// The `tracing-subscriber` filter directive (e.g. `"info"` or
    /// `"sk_singleton=debug"`).
    pub fn log_filter(&self) -> String {
        self.log_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the log filter directive.
    ///
    /// The directive is parsed before it is stored; an unparsable directive
    /// leaves the current value untouched and returns [`Error::Config`].
    pub fn set_log_filter(&self, directive: &str) -> Result<()> {
        validate_filter(directive)?;
        *self
            .log_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = directive.to_string();
        Ok(())
    }

    /// Whether lazy cells emit `debug!`/`warn!` events around construction.
    pub fn trace_initialization(&self) -> bool {
        self.trace_initialization.load(Ordering::Relaxed)
    }

    /// Enable or disable construction events.
    pub fn set_trace_initialization(&self, enabled: bool) {
        self.trace_initialization.store(enabled, Ordering::Relaxed);
    }

    /// Apply every value present in `config`.
    ///
    /// The log filter is the only fallible value and is applied first, so a
    /// rejected config changes nothing.
    pub fn apply(&self, config: &SettingsConfig) -> Result<()> {
        if let Some(directive) = &config.log_filter {
            validate_filter(directive)?;
            *self
                .log_filter
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = directive.clone();
        }
        if let Some(enabled) = config.trace_initialization {
            self.set_trace_initialization(enabled);
        }
        Ok(())
    }

    /// Restore the built-in defaults.
    pub fn reset(&self) {
        *self
            .log_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = DEFAULT_LOG_FILTER.to_string();
        self.set_trace_initialization(true);
    }
}

fn validate_filter(directive: &str) -> Result<()> {
    crate::ensure!(!directive.trim().is_empty(), "log filter must not be empty");
    EnvFilter::try_new(directive)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("invalid log filter {directive:?}: {e}")))
}

/// A partial settings document, as read from configuration files.
///
/// Absent keys leave the corresponding setting unchanged.
///
/// ```
/// use sk_core::settings::SettingsConfig;
///
/// let cfg = SettingsConfig::from_toml_str(r#"
///     log_filter = "sk_singleton=debug"
///     trace_initialization = false
/// "#).unwrap();
/// assert_eq!(cfg.log_filter.as_deref(), Some("sk_singleton=debug"));
/// assert_eq!(cfg.trace_initialization, Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Log filter directive.
    pub log_filter: Option<String>,
    /// Emit events around lazy construction.
    pub trace_initialization: Option<bool>,
}

impl SettingsConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }
}
