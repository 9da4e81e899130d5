// ============================================================================
// Match Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::OrderId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One pairwise fill between a resting order and an incoming order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    /// Unique match identifier
    pub id: Uuid,

    /// The selling side of the fill
    pub ask: OrderId,

    /// The buying side of the fill
    pub bid: OrderId,

    /// Executed quantity
    pub size_filled: Quantity,

    /// Execution price, always the resting level's price
    pub price: Price,

    pub timestamp: DateTime<Utc>,
}

impl Match {
    pub fn new(ask: OrderId, bid: OrderId, size_filled: Quantity, price: Price) -> Self {
        Self {
            id: Uuid::new_v4(),
            ask,
            bid,
            size_filled,
            price,
            timestamp: Utc::now(),
        }
    }

    /// Notional value of the fill (price * size)
    pub fn notional(&self) -> Quantity {
        &self.price * &self.size_filled
    }
}
