//! The global logger: an ambient capability with a `tracing` default.
//!
//! Library code writes through [`global_logger`] without threading a logger
//! parameter everywhere.  Application setup may install its own [`Logger`]
//! once, early, with [`set_global_logger`], and then [`seal_global_logger`]
//! to stop anyone else from changing it.

use std::sync::Arc;

use sk_core::Result;

use crate::slot::AmbientSlot;

/// Sink for free-form log records.
pub trait Logger: Send + Sync {
    /// Record one message.
    fn write(&self, record: &str);
}

/// The built-in logger: forwards every record to `tracing` at `INFO`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn write(&self, record: &str) {
        tracing::info!(target: "sk_ambient::logger", "{record}");
    }
}

fn default_logger() -> Arc<dyn Logger> {
    Arc::new(DefaultLogger)
}

static GLOBAL_LOGGER: AmbientSlot<dyn Logger> = AmbientSlot::new(default_logger);

/// The slot behind the global logger, for scoped overrides in tests.
pub fn global_logger_slot() -> &'static AmbientSlot<dyn Logger> {
    &GLOBAL_LOGGER
}

/// The current global logger ([`DefaultLogger`] unless overridden).
pub fn global_logger() -> Arc<dyn Logger> {
    GLOBAL_LOGGER.get()
}

/// Replace the global logger, returning the previous override.
pub fn set_global_logger(logger: Arc<dyn Logger>) -> Result<Option<Arc<dyn Logger>>> {
    GLOBAL_LOGGER.set(logger)
}

/// Go back to [`DefaultLogger`].
pub fn reset_global_logger() -> Result<Option<Arc<dyn Logger>>> {
    GLOBAL_LOGGER.reset()
}

/// Forbid further changes to the global logger.
pub fn seal_global_logger() {
    GLOBAL_LOGGER.seal();
}
