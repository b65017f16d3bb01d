//! Logging bootstrap.
//!
//! singleton-kit emits events through `tracing` and never installs a
//! subscriber on its own.  Binaries and test harnesses that want to see those
//! events call [`install`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::errors::{Error, Result};
use crate::settings::Settings;

/// Install a global `tracing` subscriber with a `fmt` layer.
///
/// The filter is taken from `RUST_LOG` when it is set and valid, otherwise
/// from [`Settings::log_filter`].  Returns
/// [`Error::LoggingAlreadyInstalled`] if any global subscriber is already in
/// place.
pub fn install(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter(settings)?)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| Error::LoggingAlreadyInstalled)
}

fn build_env_filter(settings: &Settings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(settings.log_filter())
            .map_err(|e| Error::Config(e.to_string())),
    }
}
