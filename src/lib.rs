// ============================================================================
// Price-Time Book Library
// Limit order book with price-time priority matching
// ============================================================================

//! # Price-Time Book
//!
//! A limit order book for one instrument with price-time priority matching.
//!
//! ## Features
//!
//! - **Arbitrary-precision** prices and sizes (`num-bigint`)
//! - **Price-time priority**: best price first, oldest order first per level
//! - **All-or-nothing liquidity check** before a market order touches the book
//! - **Explicit exclusive access** through [`engine::SharedBook`] or a
//!   single-writer actor (feature `async`)
//! - **Event publishing** for audit trails and market data
//!
//! ## Example
//!
//! ```rust
//! use price_time_book::prelude::*;
//!
//! let mut book = Book::new("ETH");
//!
//! // Limit orders only rest
//! book.place_limit_order(10_000u64, Order::ask(10u64)).unwrap();
//! book.place_limit_order(9_000u64, Order::ask(20u64)).unwrap();
//! assert_eq!(book.best_ask().map(ToString::to_string), Some("9000".to_string()));
//!
//! // Market orders match against resting liquidity
//! let mut buy = Order::bid(25u64);
//! let matches = book.place_market_order(&mut buy).unwrap();
//! assert_eq!(matches.len(), 2);
//! assert!(buy.is_filled());
//!
//! // Asking for more than the book holds is an error, not a panic
//! let mut too_big = Order::bid(100u64);
//! assert!(matches!(
//!     book.place_market_order(&mut too_big),
//!     Err(BookError::InsufficientLiquidity { .. })
//! ));
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::order::state::{OrderState, OrderStateTransition};
    pub use crate::domain::{
        BookConfig, BookError, BookResult, BookSnapshot, LevelSummary, Limit, Match, Order,
        OrderId, OrderView, Side,
    };
    #[cfg(feature = "async")]
    pub use crate::engine::BookActor;
    pub use crate::engine::{create_from_config, Book, BookBuilder, SharedBook};
    pub use crate::interfaces::{BookEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
    pub use crate::numeric::{Price, Quantity};
}
