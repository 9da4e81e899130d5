// ============================================================================
// Shared Book
// Lock-serialized handle for callers on several threads
// ============================================================================

use crate::domain::{BookResult, BookSnapshot, LevelSummary, Match, Order, OrderId, Side};
use crate::numeric::{Price, Quantity};
use parking_lot::Mutex;
use std::sync::Arc;

use super::Book;

/// Cloneable handle that serializes every call on one [`Book`].
///
/// Each operation holds the book's mutex for its whole duration, queries
/// included, so no caller ever observes a half-applied market order.
#[derive(Clone)]
pub struct SharedBook {
    inner: Arc<Mutex<Book>>,
}

impl SharedBook {
    pub fn new(book: Book) -> Self {
        Self {
            inner: Arc::new(Mutex::new(book)),
        }
    }

    /// Rest a new order and return its handle
    pub fn place_limit_order(
        &self,
        price: impl Into<Price>,
        side: Side,
        size: impl Into<Quantity>,
    ) -> BookResult<OrderId> {
        let order = Order::new(side, size);
        self.inner.lock().place_limit_order(price, order)
    }

    pub fn place_market_order(
        &self,
        side: Side,
        size: impl Into<Quantity>,
    ) -> BookResult<Vec<Match>> {
        let mut order = Order::new(side, size);
        self.inner.lock().place_market_order(&mut order)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> BookResult<()> {
        self.inner.lock().cancel_order(order_id).map(|_| ())
    }

    /// Ask levels, lowest price first
    pub fn best_asks(&self) -> Vec<LevelSummary> {
        self.inner.lock().best_asks()
    }

    /// Bid levels, highest price first
    pub fn best_bids(&self) -> Vec<LevelSummary> {
        self.inner.lock().best_bids()
    }

    pub fn snapshot(&self, levels: usize) -> BookSnapshot {
        self.inner.lock().depth(levels)
    }

    /// Run `f` with exclusive access to the book
    pub fn with_book<R>(&self, f: impl FnOnce(&mut Book) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
