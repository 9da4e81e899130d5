// ============================================================================
// Event Handler Interface
// Defines the contract for handling book events
// ============================================================================

use crate::domain::{Match, OrderId, Side};
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events published by a book after each state change
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BookEvent {
    /// Limit order now resting at a price level
    OrderRested {
        order_id: OrderId,
        side: Side,
        price: Price,
        size: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Pairwise fill between a resting and an incoming order
    OrderMatched {
        fill: Match,
        timestamp: DateTime<Utc>,
    },

    /// Order fully filled (resting or incoming)
    OrderFilled {
        order_id: OrderId,
        timestamp: DateTime<Utc>,
    },

    /// Resting order cancelled with its remaining size
    OrderCancelled {
        order_id: OrderId,
        side: Side,
        price: Price,
        remaining: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Order refused before touching book state
    OrderRejected {
        order_id: OrderId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing book events
/// Implementations can handle logging, metrics, market data fan-out, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a book event
    fn on_event(&self, event: BookEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<BookEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: BookEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: BookEvent) {
        tracing::debug!("Book event: {:?}", event);
    }
}
