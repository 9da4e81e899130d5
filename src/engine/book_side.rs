// ============================================================================
// Book Side
// Price-indexed price levels of one side
// ============================================================================

use crate::domain::{LevelSummary, Limit, Order, Side};
use crate::numeric::{total, Price, Quantity};
use std::collections::BTreeMap;

/// Bids or asks.
///
/// The `BTreeMap` is both the exact-price index and the price ordering, so
/// best-first iteration needs no re-sort. Empty levels are never kept.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    limits: BTreeMap<Price, Limit>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            limits: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn limit(&self, price: &Price) -> Option<&Limit> {
        self.limits.get(price)
    }

    pub(crate) fn limit_mut(&mut self, price: &Price) -> Option<&mut Limit> {
        self.limits.get_mut(price)
    }

    /// Find or create the level at `price` and append the order to it
    pub(crate) fn insert_order(&mut self, price: Price, order: Order) {
        self.limits
            .entry(price)
            .or_insert_with_key(|price| Limit::new(price.clone()))
            .add_order(order);
    }

    pub(crate) fn remove_limit(&mut self, price: &Price) -> Option<Limit> {
        self.limits.remove(price)
    }

    /// Get the best (top-of-book) price
    pub fn best_price(&self) -> Option<&Price> {
        self.best_first().next().map(Limit::price)
    }

    /// Levels ordered best price first: descending for bids, ascending for asks
    pub fn best_first(&self) -> Box<dyn Iterator<Item = &Limit> + '_> {
        match self.side {
            Side::Bid => Box::new(self.limits.values().rev()),
            Side::Ask => Box::new(self.limits.values()),
        }
    }

    pub fn total_volume(&self) -> Quantity {
        total(self.limits.values().map(Limit::total_volume))
    }

    pub fn order_count(&self) -> usize {
        self.limits.values().map(Limit::len).sum()
    }

    /// Get depth at N levels
    pub fn depth(&self, num_levels: usize) -> Vec<LevelSummary> {
        self.best_first()
            .take(num_levels)
            .map(|limit| LevelSummary {
                price: limit.price().clone(),
                aggregate_size: limit.total_volume().clone(),
                order_count: limit.len(),
            })
            .collect()
    }
}
