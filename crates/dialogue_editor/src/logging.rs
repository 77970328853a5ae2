// SPDX-License-Identifier: MIT OR Apache-2.0
//! Log output for editor hosts.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "dialogue_editor=debug,dialogue_graph=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber.
///
/// Returns an error if one is already installed (for example when the host
/// set up its own).
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Install the global subscriber, keeping any existing one
pub fn init() {
    if let Err(e) = try_init() {
        tracing::debug!("Logging already initialized: {e}");
    }
}
