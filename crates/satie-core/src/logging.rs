//! Logging initialization for Satie.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! application's call. These helpers set one up with sensible defaults.
//!
//! ```rust,no_run
//! use satie_core::logging::init_logging;
//!
//! fn main() {
//!     // Call this before registering routes or serving
//!     init_logging();
//! }
//! ```
//!
//! The log level is controlled via the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Show route registration and match decisions
//! RUST_LOG=debug cargo run
//!
//! # Production: warnings and errors only
//! RUST_LOG=warn cargo run
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with sensible defaults.
///
/// Call once at startup. The level comes from `RUST_LOG`, defaulting to
/// `info` when unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize logging at a fixed level, ignoring `RUST_LOG` unless set.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
