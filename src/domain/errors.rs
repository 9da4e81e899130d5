// ============================================================================
// Book Errors
// Recoverable failures of book operations
// ============================================================================

use super::order::state::{OrderState, OrderStateTransition};
use super::OrderId;
use crate::numeric::Quantity;
use thiserror::Error;

/// Errors returned by book operations.
///
/// None of these leave the book in a partially-mutated state: every check
/// runs before the first mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// A market order asked for more than the opposing side holds
    #[error("not enough volume [size: {available}] for market order [size: {requested}]")]
    InsufficientLiquidity {
        requested: Quantity,
        available: Quantity,
    },

    /// Cancellation of an order that is filled, cancelled or unknown
    #[error("order {0} is not resting in the book")]
    OrderNotResting(OrderId),

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid order state transition from {from:?} via {transition:?}")]
    InvalidStateTransition {
        from: OrderState,
        transition: OrderStateTransition,
    },

    /// The book actor stopped before answering
    #[cfg(feature = "async")]
    #[error("book actor is no longer running")]
    ActorUnavailable,
}

/// Result type alias for book operations
pub type BookResult<T> = Result<T, BookError>;
