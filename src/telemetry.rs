//! Tracing setup for hosts that have not installed a subscriber.

use tracing::debug;

/// Install the default `tracing_subscriber::fmt` subscriber.
/// Safe to call more than once; later calls leave the existing one in place.
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt().try_init() {
        debug!(error = %e, "tracing subscriber already installed");
    }
}
