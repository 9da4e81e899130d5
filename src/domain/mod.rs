// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod errors;
pub mod fill;
pub mod limit;
pub mod order;
pub mod snapshot;

pub use config::BookConfig;
pub use errors::{BookError, BookResult};
pub use fill::Match;
pub use limit::{Limit, LimitFill};
pub use order::{Order, OrderId, Side};
pub use snapshot::{BookSnapshot, LevelSummary, OrderView};

// Re-export state machine
pub use order::state::{OrderState, OrderStateTransition};
