// ============================================================================
// Logging Setup
// ============================================================================

use crate::domain::{BookError, BookResult};
use tracing::Level;

/// Install a global `tracing` fmt subscriber writing at `level` and above.
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(level: Level) -> BookResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init()
        .map_err(|err| BookError::InvalidConfig(format!("logging: {err}")))
}
