//! Structured logging setup.
//!
//! The core itself only emits `tracing` spans and events at module
//! boundaries (parse pass, index mutation, search dispatch, primer
//! generation); this module centralizes the one piece of ambient
//! plumbing a binary embedding this crate needs: wiring up a subscriber.

use tracing_subscriber::EnvFilter;

/// Initializes a process-wide `tracing` subscriber reading its filter
/// from the `RUST_LOG` environment variable, falling back to `info` when
/// unset or invalid.
///
/// Safe to call more than once; subsequent calls are no-ops if a global
/// subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
