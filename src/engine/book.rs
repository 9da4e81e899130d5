// ============================================================================
// Book
// Price-time priority limit order book for one instrument
// ============================================================================

use crate::domain::{
    BookConfig, BookError, BookResult, BookSnapshot, LevelSummary, Limit, Match, Order, OrderId,
    OrderState, OrderView, Side,
};
use crate::interfaces::{BookEvent, EventHandler, NoOpEventHandler};
use crate::numeric::{signed_difference, Price, Quantity};
use chrono::Utc;
use num_bigint::BigInt;
use std::collections::HashMap;
use std::sync::Arc;

use super::book_side::BookSide;

/// Limit order book with price-time priority.
///
/// Limit orders only rest; market orders match against the opposing side,
/// best price first and oldest order first inside a level.
///
/// ## Exclusive access
///
/// A `Book` has no internal synchronization. Every mutation takes `&mut self`,
/// so callers sharing one book must serialize access to it, either through
/// [`SharedBook`](super::SharedBook) or by handing the book to a single-writer
/// [`BookActor`](super::BookActor) (feature `async`).
pub struct Book {
    config: BookConfig,

    /// Bid side of the book
    bids: BookSide,

    /// Ask side of the book
    asks: BookSide,

    /// Resting order handle -> (side, price of its level)
    order_index: HashMap<OrderId, (Side, Price)>,

    event_handler: Arc<dyn EventHandler>,
}

impl Book {
    /// Create an empty book with no admission rules beyond positive sizes
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            config: BookConfig::new(instrument),
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            order_index: HashMap::new(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Create an empty book from a validated configuration
    pub fn with_config(
        config: BookConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> BookResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            order_index: HashMap::new(),
            event_handler,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.config.instrument
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Rest `order` at `price` on its own side.
    ///
    /// No matching is attempted, even when `price` crosses the opposing best
    /// price.
    pub fn place_limit_order(
        &mut self,
        price: impl Into<Price>,
        order: Order,
    ) -> BookResult<OrderId> {
        let price = price.into();

        if let Err(err) = self.admit_limit(&price, &order) {
            tracing::debug!(order_id = %order.id(), %err, "limit order rejected");
            self.reject(order.id(), &err);
            return Err(err);
        }

        let order_id = order.id();
        let side = order.side();
        let size = order.size().clone();

        self.side_mut(side).insert_order(price.clone(), order);
        self.order_index.insert(order_id, (side, price.clone()));

        tracing::debug!(%order_id, ?side, %price, %size, "limit order resting");
        self.event_handler.on_event(BookEvent::OrderRested {
            order_id,
            side,
            price,
            size,
            timestamp: Utc::now(),
        });

        Ok(order_id)
    }

    /// Fill `order` against the opposing side, best price first.
    ///
    /// Fails with [`BookError::InsufficientLiquidity`] without touching the
    /// book when the opposing side holds less than `order`'s size. On success
    /// `order` is filled and the matches are returned in execution order.
    pub fn place_market_order(&mut self, order: &mut Order) -> BookResult<Vec<Match>> {
        let admitted = self.admit_market(order);
        if let Err(err) = admitted {
            tracing::debug!(order_id = %order.id(), %err, "market order rejected");
            self.reject(order.id(), &err);
            return Err(err);
        }

        let opposing = match order.side() {
            Side::Bid => &mut self.asks,
            Side::Ask => &mut self.bids,
        };

        let mut matches = Vec::new();
        let mut events = Vec::new();

        while !order.is_filled() {
            let Some(price) = opposing.best_price().cloned() else {
                break;
            };
            let Some(limit) = opposing.limit_mut(&price) else {
                break;
            };

            let outcome = limit.fill(order);
            if limit.is_empty() {
                opposing.remove_limit(&price);
            }

            for fill in &outcome.matches {
                events.push(BookEvent::OrderMatched {
                    fill: fill.clone(),
                    timestamp: Utc::now(),
                });
            }
            for filled in &outcome.filled_orders {
                self.order_index.remove(&filled.id());
                events.push(BookEvent::OrderFilled {
                    order_id: filled.id(),
                    timestamp: Utc::now(),
                });
            }

            matches.extend(outcome.matches);
        }

        if order.is_filled() {
            events.push(BookEvent::OrderFilled {
                order_id: order.id(),
                timestamp: Utc::now(),
            });
        }

        tracing::debug!(
            order_id = %order.id(),
            side = ?order.side(),
            matches = matches.len(),
            "market order executed"
        );
        self.event_handler.on_events(events);

        Ok(matches)
    }

    /// Remove a resting order and return it with its remaining size.
    ///
    /// Fails with [`BookError::OrderNotResting`] when the order was already
    /// filled or cancelled, or was never placed in this book.
    pub fn cancel_order(&mut self, order_id: OrderId) -> BookResult<Order> {
        let (side, price) = self
            .order_index
            .remove(&order_id)
            .ok_or(BookError::OrderNotResting(order_id))?;

        let book_side = self.side_mut(side);
        let limit = book_side
            .limit_mut(&price)
            .ok_or(BookError::OrderNotResting(order_id))?;
        let mut order = limit
            .delete_order(order_id)
            .ok_or(BookError::OrderNotResting(order_id))?;

        if limit.is_empty() {
            book_side.remove_limit(&price);
        }
        order.mark_cancelled();

        tracing::debug!(%order_id, ?side, %price, remaining = %order.size(), "order cancelled");
        self.event_handler.on_event(BookEvent::OrderCancelled {
            order_id,
            side,
            price,
            remaining: order.size().clone(),
            timestamp: Utc::now(),
        });

        Ok(order)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn ask_total_volume(&self) -> Quantity {
        self.asks.total_volume()
    }

    pub fn bid_total_volume(&self) -> Quantity {
        self.bids.total_volume()
    }

    /// Ask levels, lowest price first
    pub fn asks(&self) -> Vec<&Limit> {
        self.asks.best_first().collect()
    }

    /// Bid levels, highest price first
    pub fn bids(&self) -> Vec<&Limit> {
        self.bids.best_first().collect()
    }

    /// Every ask level summarized, lowest price first
    pub fn best_asks(&self) -> Vec<LevelSummary> {
        self.asks.depth(usize::MAX)
    }

    /// Every bid level summarized, highest price first
    pub fn best_bids(&self) -> Vec<LevelSummary> {
        self.bids.depth(usize::MAX)
    }

    pub fn best_ask(&self) -> Option<&Price> {
        self.asks.best_price()
    }

    pub fn best_bid(&self) -> Option<&Price> {
        self.bids.best_price()
    }

    /// Best ask minus best bid, negative when the book is crossed
    pub fn spread(&self) -> Option<BigInt> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(signed_difference(ask, bid)),
            _ => None,
        }
    }

    /// Get book snapshot of the best `levels` levels per side
    pub fn depth(&self, levels: usize) -> BookSnapshot {
        BookSnapshot::with_depth(
            self.config.instrument.clone(),
            self.bids.depth(levels),
            self.asks.depth(levels),
        )
    }

    /// Resting orders of one side, best price first and oldest first per level
    pub fn resting_orders(&self, side: Side) -> Vec<OrderView> {
        self.side(side)
            .best_first()
            .flat_map(|limit| {
                limit.orders().iter().map(move |order| OrderView {
                    id: order.id(),
                    side: order.side(),
                    price: limit.price().clone(),
                    size: order.size().clone(),
                    created_at: order.created_at(),
                    timestamp: order.timestamp(),
                })
            })
            .collect()
    }

    /// Look up a resting order by its handle
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = self.order_index.get(&order_id)?;
        self.side(*side).limit(price)?.get(order_id)
    }

    pub fn level_count(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Number of resting orders on both sides
    pub fn order_count(&self) -> usize {
        self.order_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    fn admit_limit(&self, price: &Price, order: &Order) -> BookResult<()> {
        if order.is_resting() || self.order_index.contains_key(&order.id()) {
            return Err(BookError::InvalidOrder(format!(
                "order {} is already resting",
                order.id()
            )));
        }

        Self::check_pending(order)?;
        self.config.check_size(order.size())?;
        self.config.check_price(price)
    }

    fn admit_market(&self, order: &Order) -> BookResult<()> {
        if order.is_resting() {
            return Err(BookError::InvalidOrder(format!(
                "order {} is resting and cannot be sent as a market order",
                order.id()
            )));
        }

        Self::check_pending(order)?;
        self.config.check_size(order.size())?;

        let available = self.side(order.side().opposite()).total_volume();
        if order.size() > &available {
            return Err(BookError::InsufficientLiquidity {
                requested: order.size().clone(),
                available,
            });
        }

        Ok(())
    }

    /// Only orders that never entered a book may be placed
    fn check_pending(order: &Order) -> BookResult<()> {
        match order.state() {
            OrderState::Pending => Ok(()),
            state => Err(BookError::InvalidOrder(format!(
                "order {} is {:?} and cannot be placed again",
                order.id(),
                state
            ))),
        }
    }

    fn reject(&self, order_id: OrderId, err: &BookError) {
        self.event_handler.on_event(BookEvent::OrderRejected {
            order_id,
            reason: err.to_string(),
            timestamp: Utc::now(),
        });
    }
}

impl std::fmt::Debug for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Book")
            .field("config", &self.config)
            .field("bids", &self.bids)
            .field("asks", &self.asks)
            .field("order_index", &self.order_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use parking_lot::Mutex;

    fn q(value: u64) -> Quantity {
        Quantity::from(value)
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<BookEvent>>,
    }

    impl EventHandler for Recorder {
        fn on_event(&self, event: BookEvent) {
            self.events.lock().push(event);
        }
    }

    #[test]
    fn test_place_limit_order() {
        let mut book = Book::new("ETH");

        let a = book.place_limit_order(10_000u64, Order::ask(10u64)).unwrap();
        let b = book.place_limit_order(9_000u64, Order::ask(20u64)).unwrap();

        assert_eq!(book.asks().len(), 2);
        assert_eq!(book.best_ask(), Some(&Price::from(9_000u64)));
        assert_eq!(book.ask_total_volume(), q(30));
        assert_eq!(book.order_count(), 2);
        assert_eq!(
            book.order(a).unwrap().limit(),
            Some(&Price::from(10_000u64))
        );
        assert_eq!(book.order(b).unwrap().state(), OrderState::Resting);
    }

    #[test]
    fn test_limit_order_never_crosses() {
        let mut book = Book::new("ETH");
        book.place_limit_order(100u64, Order::ask(5u64)).unwrap();
        book.place_limit_order(120u64, Order::bid(5u64)).unwrap();

        assert_eq!(book.ask_total_volume(), q(5));
        assert_eq!(book.bid_total_volume(), q(5));
        assert_eq!(book.spread(), Some(BigInt::from(-20)));
    }

    #[test]
    fn test_place_market_order() {
        let mut book = Book::new("ETH");
        let ask_id = book.place_limit_order(10_000u64, Order::ask(20u64)).unwrap();

        let mut buy = Order::bid(10u64);
        let matches = book.place_market_order(&mut buy).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(book.asks().len(), 1);
        assert_eq!(book.ask_total_volume(), q(10));
        assert_eq!(matches[0].ask, ask_id);
        assert_eq!(matches[0].bid, buy.id());
        assert_eq!(matches[0].size_filled, q(10));
        assert_eq!(matches[0].price, Price::from(10_000u64));
        assert!(buy.is_filled());
        assert_eq!(buy.state(), OrderState::Filled);
        assert_eq!(book.order(ask_id).unwrap().size(), &q(10));
    }

    #[test]
    fn test_place_market_order_multi_fill() {
        let mut book = Book::new("ETH");
        book.place_limit_order(5_000u64, Order::bid(10u64)).unwrap();
        book.place_limit_order(5_000u64, Order::bid(1u64)).unwrap();
        book.place_limit_order(9_000u64, Order::bid(8u64)).unwrap();
        book.place_limit_order(10_000u64, Order::bid(5u64)).unwrap();
        assert_eq!(book.bid_total_volume(), q(24));

        let mut sell = Order::ask(20u64);
        let matches = book.place_market_order(&mut sell).unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(book.bid_total_volume(), q(4));
        assert_eq!(book.bids().len(), 1);
        assert_eq!(book.best_bid(), Some(&Price::from(5_000u64)));

        let prices: Vec<Price> = matches.iter().map(|m| m.price.clone()).collect();
        assert_eq!(
            prices,
            vec![
                Price::from(10_000u64),
                Price::from(9_000u64),
                Price::from(5_000u64)
            ]
        );
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_insufficient_liquidity_leaves_book_untouched() {
        let mut book = Book::new("ETH");
        book.place_limit_order(10_000u64, Order::ask(4u64)).unwrap();
        book.place_limit_order(11_000u64, Order::ask(6u64)).unwrap();
        let before = book.best_asks();

        let mut buy = Order::bid(15u64);
        let err = book.place_market_order(&mut buy).unwrap_err();

        assert_eq!(
            err,
            BookError::InsufficientLiquidity {
                requested: q(15),
                available: q(10),
            }
        );
        assert_eq!(book.best_asks(), before);
        assert_eq!(book.order_count(), 2);
        assert_eq!(buy.size(), &q(15));
        assert_eq!(buy.state(), OrderState::Pending);
    }

    #[test]
    fn test_market_order_on_empty_side() {
        let mut book = Book::new("ETH");
        let mut sell = Order::ask(1u64);
        assert!(matches!(
            book.place_market_order(&mut sell),
            Err(BookError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_invalid_orders_rejected() {
        let mut book = Book::new("ETH");

        assert!(matches!(
            book.place_limit_order(100u64, Order::bid(0u64)),
            Err(BookError::InvalidOrder(_))
        ));
        assert!(matches!(
            book.place_limit_order(0u64, Order::bid(1u64)),
            Err(BookError::InvalidOrder(_))
        ));

        let mut empty = Order::ask(0u64);
        assert!(matches!(
            book.place_market_order(&mut empty),
            Err(BookError::InvalidOrder(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_cancel_order() {
        let mut book = Book::new("ETH");
        let id = book.place_limit_order(10_000u64, Order::bid(10u64)).unwrap();
        assert_eq!(book.bid_total_volume(), q(10));

        let cancelled = book.cancel_order(id).unwrap();

        assert_eq!(cancelled.state(), OrderState::Cancelled);
        assert_eq!(cancelled.size(), &q(10));
        assert!(cancelled.limit().is_none());
        assert!(book.bid_total_volume().is_zero());
        assert!(book.bids().is_empty());
        assert!(book.order(id).is_none());
    }

    #[test]
    fn test_cancel_twice_fails() {
        let mut book = Book::new("ETH");
        let id = book.place_limit_order(10_000u64, Order::bid(10u64)).unwrap();
        book.place_limit_order(10_000u64, Order::bid(3u64)).unwrap();

        book.cancel_order(id).unwrap();
        assert_eq!(book.cancel_order(id), Err(BookError::OrderNotResting(id)));
        assert_eq!(book.bid_total_volume(), q(3));
    }

    #[test]
    fn test_cancel_filled_order_fails() {
        let mut book = Book::new("ETH");
        let id = book.place_limit_order(10_000u64, Order::ask(5u64)).unwrap();

        let mut buy = Order::bid(5u64);
        book.place_market_order(&mut buy).unwrap();

        assert_eq!(book.cancel_order(id), Err(BookError::OrderNotResting(id)));

        let unknown = OrderId::new();
        assert_eq!(
            book.cancel_order(unknown),
            Err(BookError::OrderNotResting(unknown))
        );
    }

    #[test]
    fn test_cancelled_order_cannot_rest_again() {
        let mut book = Book::new("ETH");
        let id = book.place_limit_order(100u64, Order::ask(5u64)).unwrap();
        let cancelled = book.cancel_order(id).unwrap();

        assert!(matches!(
            book.place_limit_order(100u64, cancelled),
            Err(BookError::InvalidOrder(_))
        ));
        assert!(book.order(id).is_none());
        assert!(book.ask_total_volume().is_zero());
        assert!(book.is_empty());
    }

    #[test]
    fn test_cancelled_order_cannot_trade() {
        let mut book = Book::new("ETH");
        let ask = book.place_limit_order(100u64, Order::ask(5u64)).unwrap();
        let bid = book.place_limit_order(90u64, Order::bid(5u64)).unwrap();
        let mut cancelled = book.cancel_order(bid).unwrap();

        assert!(matches!(
            book.place_market_order(&mut cancelled),
            Err(BookError::InvalidOrder(_))
        ));
        assert_eq!(cancelled.state(), OrderState::Cancelled);
        assert_eq!(cancelled.size(), &q(5));
        assert_eq!(book.order(ask).unwrap().size(), &q(5));
        assert_eq!(book.ask_total_volume(), q(5));
    }

    #[test]
    fn test_filled_market_order_cannot_be_reused() {
        let mut book = Book::new("ETH");
        book.place_limit_order(100u64, Order::ask(3u64)).unwrap();
        book.place_limit_order(100u64, Order::ask(3u64)).unwrap();

        let mut buy = Order::bid(3u64);
        book.place_market_order(&mut buy).unwrap();
        assert_eq!(buy.state(), OrderState::Filled);

        assert!(matches!(
            book.place_market_order(&mut buy),
            Err(BookError::InvalidOrder(_))
        ));
        assert!(matches!(
            book.place_limit_order(100u64, buy),
            Err(BookError::InvalidOrder(_))
        ));
        assert_eq!(book.ask_total_volume(), q(3));
    }

    #[test]
    fn test_price_time_priority_within_level() {
        let mut book = Book::new("ETH");
        let first = book.place_limit_order(100u64, Order::ask(5u64)).unwrap();
        let second = book.place_limit_order(100u64, Order::ask(5u64)).unwrap();

        let mut buy = Order::bid(7u64);
        let matches = book.place_market_order(&mut buy).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].ask, first);
        assert_eq!(matches[0].size_filled, q(5));
        assert_eq!(matches[1].ask, second);
        assert_eq!(matches[1].size_filled, q(2));
        assert!(book.order(first).is_none());
        assert_eq!(book.order(second).unwrap().size(), &q(3));
    }

    #[test]
    fn test_time_priority_survives_cancellation() {
        let mut book = Book::new("ETH");
        let a = book.place_limit_order(100u64, Order::bid(1u64)).unwrap();
        let b = book.place_limit_order(100u64, Order::bid(1u64)).unwrap();
        let c = book.place_limit_order(100u64, Order::bid(1u64)).unwrap();
        let d = book.place_limit_order(100u64, Order::bid(1u64)).unwrap();

        book.cancel_order(a).unwrap();

        let mut sell = Order::ask(2u64);
        let matches = book.place_market_order(&mut sell).unwrap();
        let filled: Vec<OrderId> = matches.iter().map(|m| m.bid).collect();
        assert_eq!(filled, vec![b, c]);
        assert!(book.order(d).is_some());
    }

    #[test]
    fn test_resting_orders_listing() {
        let mut book = Book::new("ETH");
        let low = book.place_limit_order(5_000u64, Order::bid(10u64)).unwrap();
        let low_later = book.place_limit_order(5_000u64, Order::bid(1u64)).unwrap();
        let high = book.place_limit_order(9_000u64, Order::bid(8u64)).unwrap();

        let listing = book.resting_orders(Side::Bid);
        let ids: Vec<OrderId> = listing.iter().map(|view| view.id).collect();
        assert_eq!(ids, vec![high, low, low_later]);
        assert_eq!(listing[0].price, Price::from(9_000u64));
        assert!(book.resting_orders(Side::Ask).is_empty());
    }

    #[test]
    fn test_depth_snapshot() {
        let mut book = Book::new("ETH");
        book.place_limit_order(9_000u64, Order::bid(8u64)).unwrap();
        book.place_limit_order(9_000u64, Order::bid(2u64)).unwrap();
        book.place_limit_order(10_000u64, Order::ask(20u64)).unwrap();
        book.place_limit_order(11_000u64, Order::ask(1u64)).unwrap();

        let snapshot = book.depth(1);
        assert_eq!(snapshot.instrument, "ETH");
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.asks.len(), 1);
        assert_eq!(snapshot.bids[0].aggregate_size, q(10));
        assert_eq!(snapshot.bids[0].order_count, 2);
        assert_eq!(snapshot.spread, Some(BigInt::from(1_000)));

        let asks = book.best_asks();
        assert_eq!(asks.len(), 2);
        assert_eq!(asks[0].price, Price::from(10_000u64));
        assert_eq!(book.best_bids()[0].price, Price::from(9_000u64));
    }

    #[test]
    fn test_with_config_enforces_admission() {
        let config = BookConfig::new("ETH").with_tick_size(100u32).with_lot_size(5u32);
        let mut book = Book::with_config(config, Arc::new(NoOpEventHandler)).unwrap();

        assert!(book.place_limit_order(9_000u64, Order::ask(10u64)).is_ok());
        assert!(book.place_limit_order(9_050u64, Order::ask(10u64)).is_err());
        assert!(book.place_limit_order(9_000u64, Order::ask(3u64)).is_err());
        assert_eq!(book.order_count(), 1);

        assert!(Book::with_config(BookConfig::new(""), Arc::new(NoOpEventHandler)).is_err());
    }

    #[test]
    fn test_events_published() {
        let recorder = Arc::new(Recorder::default());
        let mut book = Book::with_config(BookConfig::new("ETH"), recorder.clone()).unwrap();

        let resting = book.place_limit_order(100u64, Order::ask(5u64)).unwrap();
        let mut buy = Order::bid(5u64);
        book.place_market_order(&mut buy).unwrap();
        let mut too_big = Order::bid(1u64);
        book.place_market_order(&mut too_big).unwrap_err();

        let events = recorder.events.lock();
        assert!(matches!(events[0], BookEvent::OrderRested { order_id, .. } if order_id == resting));
        assert!(matches!(events[1], BookEvent::OrderMatched { .. }));
        assert!(matches!(events[2], BookEvent::OrderFilled { order_id, .. } if order_id == resting));
        assert!(matches!(events[3], BookEvent::OrderFilled { order_id, .. } if order_id == buy.id()));
        assert!(matches!(events[4], BookEvent::OrderRejected { order_id, .. } if order_id == too_big.id()));
        assert_eq!(events.len(), 5);
    }
}
