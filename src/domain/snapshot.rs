// ============================================================================
// Book Snapshots
// Read-only views handed to the service layer
// ============================================================================

use crate::numeric::{signed_difference, total, Price, Quantity};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use super::{OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate of one price level
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSummary {
    pub price: Price,
    pub aggregate_size: Quantity,
    pub order_count: usize,
}

/// One resting order, as listed by [`Book::resting_orders`](crate::engine::Book::resting_orders)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderView {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub size: Quantity,
    pub created_at: u64,
    pub timestamp: DateTime<Utc>,
}

/// Immutable snapshot of the book's best levels
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookSnapshot {
    pub instrument: String,
    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSummary>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSummary>,
    /// Best ask minus best bid; negative when the book is crossed
    pub spread: Option<BigInt>,
    /// Mid price, rounded down
    pub mid_price: Option<Price>,
}

impl BookSnapshot {
    pub fn with_depth(
        instrument: String,
        bids: Vec<LevelSummary>,
        asks: Vec<LevelSummary>,
    ) -> Self {
        let (spread, mid_price) = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => (
                Some(signed_difference(&ask.price, &bid.price)),
                Some((&bid.price + &ask.price) / 2u32),
            ),
            _ => (None, None),
        };

        Self {
            instrument,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<&Price> {
        self.bids.first().map(|level| &level.price)
    }

    pub fn best_ask(&self) -> Option<&Price> {
        self.asks.first().map(|level| &level.price)
    }

    pub fn total_bid_size(&self) -> Quantity {
        total(self.bids.iter().map(|level| &level.aggregate_size))
    }

    pub fn total_ask_size(&self) -> Quantity {
        total(self.asks.iter().map(|level| &level.aggregate_size))
    }
}
