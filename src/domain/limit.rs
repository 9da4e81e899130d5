// ============================================================================
// Limit (Price Level)
// All orders resting at one exact price
// ============================================================================

use crate::numeric::{Price, Quantity};
use num_traits::Zero;

use super::{Match, Order, OrderId, Side};

/// Orders resting at one price, oldest first, with their aggregate volume.
///
/// Invariant: `total_volume` equals the sum of the remaining sizes of
/// `orders`, and no filled order stays in `orders`.
#[derive(Debug, Clone)]
pub struct Limit {
    price: Price,
    orders: Vec<Order>,
    total_volume: Quantity,
}

/// Result of filling an incoming order against one level
#[derive(Debug, Default)]
pub struct LimitFill {
    /// Matches in the order they were produced
    pub matches: Vec<Match>,
    /// Resting orders the fill consumed, already removed from the level
    pub filled_orders: Vec<Order>,
}

impl Limit {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: Vec::new(),
            total_volume: Quantity::zero(),
        }
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    /// Resting orders, oldest first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn total_volume(&self) -> &Quantity {
        &self.total_volume
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// Append an order at the back of the queue. No matching happens here.
    pub fn add_order(&mut self, mut order: Order) {
        order.attach(self.price.clone());
        self.total_volume += order.size();
        self.orders.push(order);
    }

    /// Remove an order by identity and hand it back detached.
    ///
    /// Returns `None` and leaves the level untouched when the order is not here.
    pub fn delete_order(&mut self, id: OrderId) -> Option<Order> {
        let index = self.orders.iter().position(|order| order.id() == id)?;
        let mut order = self.orders.swap_remove(index);

        self.total_volume -= order.size();
        order.detach();

        // swap_remove moved the last order into `index`; restore time priority
        self.orders.sort_unstable_by_key(Order::created_at);

        Some(order)
    }

    /// Fill `incoming` against the resting orders, oldest first.
    ///
    /// Volume is decremented per pairwise fill; resting orders that end up
    /// filled are removed once iteration is over.
    pub fn fill(&mut self, incoming: &mut Order) -> LimitFill {
        let mut matches = Vec::new();
        let mut consumed = Vec::new();

        for resting in self.orders.iter_mut() {
            if incoming.is_filled() {
                break;
            }

            let fill = fill_pair(resting, incoming, &self.price);
            self.total_volume -= &fill.size_filled;

            if resting.is_filled() {
                consumed.push(resting.id());
            }
            matches.push(fill);
        }

        let filled_orders = consumed
            .into_iter()
            .filter_map(|id| self.delete_order(id))
            .collect();

        LimitFill {
            matches,
            filled_orders,
        }
    }
}

/// Pairwise fill rule.
///
/// Both orders shrink by the smaller of the two sizes, so the smaller one ends
/// at zero. Which order is the ask and which the bid follows `side`, not the
/// argument position.
fn fill_pair(a: &mut Order, b: &mut Order, price: &Price) -> Match {
    debug_assert_ne!(a.side(), b.side(), "orders on the same side cannot match");

    let size_filled = a.size().min(b.size()).clone();
    a.reduce(&size_filled);
    b.reduce(&size_filled);

    let (ask, bid) = match a.side() {
        Side::Ask => (a.id(), b.id()),
        Side::Bid => (b.id(), a.id()),
    };

    Match::new(ask, bid, size_filled, price.clone())
}
