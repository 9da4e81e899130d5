// ============================================================================
// Order Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use num_traits::Zero;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-wide creation sequence, used only to order orders inside a level
static CREATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// Value Objects
// ============================================================================

/// Handle of an order, returned by limit placement and used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Buyer
    Bid,
    /// Seller
    Ask,
}

impl Side {
    /// The side an order of this side trades against
    pub fn opposite(&self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

// ============================================================================
// Order State Machine
// ============================================================================

pub mod state {
    use crate::domain::errors::{BookError, BookResult};

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderState {
        /// Created, not yet handed to a book
        Pending,
        /// Resting in a price level, untouched
        Resting,
        PartiallyFilled,
        Filled,
        Cancelled,
    }

    impl OrderState {
        pub fn is_terminal(&self) -> bool {
            matches!(self, OrderState::Filled | OrderState::Cancelled)
        }

        pub fn can_be_cancelled(&self) -> bool {
            matches!(self, OrderState::Resting | OrderState::PartiallyFilled)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderStateTransition {
        Rest,
        PartialFill,
        Fill,
        Cancel,
    }

    impl OrderState {
        pub fn transition(&self, transition: OrderStateTransition) -> BookResult<OrderState> {
            match (self, transition) {
                (OrderState::Pending, OrderStateTransition::Rest) => Ok(OrderState::Resting),
                // Incoming market orders fill without ever resting
                (OrderState::Pending, OrderStateTransition::PartialFill) => {
                    Ok(OrderState::PartiallyFilled)
                },
                (OrderState::Pending, OrderStateTransition::Fill) => Ok(OrderState::Filled),

                (OrderState::Resting, OrderStateTransition::PartialFill) => {
                    Ok(OrderState::PartiallyFilled)
                },
                (OrderState::Resting, OrderStateTransition::Fill) => Ok(OrderState::Filled),
                (OrderState::Resting, OrderStateTransition::Cancel) => Ok(OrderState::Cancelled),

                (OrderState::PartiallyFilled, OrderStateTransition::PartialFill) => {
                    Ok(OrderState::PartiallyFilled)
                },
                (OrderState::PartiallyFilled, OrderStateTransition::Fill) => Ok(OrderState::Filled),
                (OrderState::PartiallyFilled, OrderStateTransition::Cancel) => {
                    Ok(OrderState::Cancelled)
                },

                (from, transition) => Err(BookError::InvalidStateTransition {
                    from: *from,
                    transition,
                }),
            }
        }
    }
}

use state::{OrderState, OrderStateTransition};

// ============================================================================
// Order Entity
// ============================================================================

/// A single intent to buy or sell.
///
/// While resting, an order is owned by its [`Limit`](crate::domain::Limit).
/// `limit` is a lookup-only back-reference: the price key of the containing
/// level, resolved against the book side the order belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    side: Side,
    timestamp: DateTime<Utc>,
    size: Quantity,
    original_size: Quantity,
    created_at: u64,
    limit: Option<Price>,
    state: OrderState,
}

impl Order {
    pub fn new(side: Side, size: impl Into<Quantity>) -> Self {
        let size = size.into();
        Self {
            id: OrderId::new(),
            side,
            timestamp: Utc::now(),
            original_size: size.clone(),
            size,
            created_at: CREATION_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            limit: None,
            state: OrderState::Pending,
        }
    }

    pub fn bid(size: impl Into<Quantity>) -> Self {
        Self::new(Side::Bid, size)
    }

    pub fn ask(size: impl Into<Quantity>) -> Self {
        Self::new(Side::Ask, size)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Wall-clock creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Remaining size
    pub fn size(&self) -> &Quantity {
        &self.size
    }

    pub fn original_size(&self) -> &Quantity {
        &self.original_size
    }

    pub fn filled_size(&self) -> Quantity {
        &self.original_size - &self.size
    }

    /// Creation sequence; strictly increasing across all orders of the process
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Price of the level currently holding this order
    pub fn limit(&self) -> Option<&Price> {
        self.limit.as_ref()
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn is_filled(&self) -> bool {
        self.size.is_zero()
    }

    pub fn is_resting(&self) -> bool {
        self.limit.is_some()
    }

    // ========================================================================
    // Book-driven mutations
    // ========================================================================

    pub(crate) fn attach(&mut self, price: Price) {
        self.limit = Some(price);
        self.apply(OrderStateTransition::Rest);
    }

    pub(crate) fn detach(&mut self) -> Option<Price> {
        self.limit.take()
    }

    /// Reduce the remaining size by an executed quantity
    pub(crate) fn reduce(&mut self, executed: &Quantity) {
        debug_assert!(executed <= &self.size, "executed more than remaining");
        self.size -= executed;
        if self.size.is_zero() {
            self.apply(OrderStateTransition::Fill);
        } else {
            self.apply(OrderStateTransition::PartialFill);
        }
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.apply(OrderStateTransition::Cancel);
    }

    fn apply(&mut self, transition: OrderStateTransition) {
        match self.state.transition(transition) {
            Ok(next) => self.state = next,
            Err(err) => tracing::warn!(order_id = %self.id, %err, "ignored order state transition"),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?} size: {}]", self.side, self.size)
    }
}
