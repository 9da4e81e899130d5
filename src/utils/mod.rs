// ============================================================================
// Utilities Module
// Helper functions for embedding the book in a service
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;
