//! Opt-in diagnostics for C callers
//!
//! The library emits `tracing` events but installs no subscriber on its own.
//! `zvec_init_logging` installs a stderr fmt subscriber for hosts that have
//! none.

use std::os::raw::c_char;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zvec_core::{Error, Result};

use crate::ffi::str_arg;
use crate::status::{invalid_arg, CStatus};

/// Environment variable consulted when no filter is passed
pub const LOG_ENV_VAR: &str = "ZVEC_LOG";

/// Install a global subscriber filtered by `filter`, else `ZVEC_LOG`, else `info`
///
/// A subscriber that is already installed is left in place.
///
/// # Errors
/// `InvalidArgument` if `filter` is not a valid filter directive.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).map_err(|e| {
            Error::invalid_argument(format!("invalid log filter '{}': {}", directives, e))
        })?,
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if installed.is_err() {
        debug!(target: "zvec::ffi", "Subscriber already installed");
    }
    Ok(())
}

/// Install a stderr log subscriber
///
/// `filter` may be null to read `ZVEC_LOG` (default `info`). Calling this more
/// than once is harmless.
///
/// # Safety
/// `filter` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_init_logging(filter: *const c_char) -> CStatus {
    if filter.is_null() {
        return CStatus::from_result(&init_logging(None));
    }
    match str_arg(filter) {
        Some(filter) => CStatus::from_result(&init_logging(Some(filter))),
        None => invalid_arg!("log filter is not valid UTF-8"),
    }
}
