//! `tracing` subscriber setup for binaries, tests and benches
use std::time::Instant;

use human_repr::HumanDuration;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    prelude::*,
    EnvFilter,
};

/// Environment variable holding the log filter, `info` when unset
pub const LOG_ENV: &str = "INFORMED_LOG";

/// Timestamps relative to subscriber creation
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RelativeTime {
    epoch: Instant,
}

impl Default for RelativeTime {
    fn default() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl FormatTime for RelativeTime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        write!(w, "{}", self.epoch.elapsed().human_duration())
    }
}

/// Install a compact global subscriber.
///
/// Returns `false` if a global subscriber was already set, so repeated calls
/// from tests are harmless.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer().with_timer(RelativeTime::default()).compact())
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok()
}
