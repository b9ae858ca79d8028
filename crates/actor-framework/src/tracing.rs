//! Process-wide tracing setup shared by binaries built on the framework.

use tracing_subscriber::EnvFilter;

/// Initializes structured logging with `RUST_LOG` filtering.
///
/// Falls back to `info` when `RUST_LOG` is unset or unparsable. Calling it twice is
/// harmless: the second install attempt is ignored.
///
/// ```bash
/// RUST_LOG=info cargo run                           # actor start/stop, outcomes
/// RUST_LOG=actor_framework=debug,flash_sale=debug   # every message and payload
/// ```
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
