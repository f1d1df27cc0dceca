//! Structured logging via the `tracing` crate.
//!
//! Level-based filtering through `RUST_LOG`, defaulting to `info`.
//! Initialization is idempotent so embedding applications (and tests) can
//! add the plugin freely.

use bevy::prelude::*;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub struct LoggingPlugin;

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing_default();
    }
}

static INIT: Once = Once::new();

/// Install the global tracing subscriber once.
///
/// Falls back to `info` when `RUST_LOG` is unset or malformed. A subscriber
/// already installed by the embedding application wins; `try_init` failure
/// is ignored.
pub fn init_tracing_default() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
