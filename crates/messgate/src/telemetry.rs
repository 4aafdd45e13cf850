//! Tracing/logging initialization.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! the application installs a subscriber. Apps that don't have their own
//! logging setup can call [`init`].

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG` (default: `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], with a different fallback when `RUST_LOG` is unset,
/// e.g. `"messgate=debug"`.
pub fn init_with_default(directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_default("debug");
        init();
        tracing::info!("still logging");
    }
}
