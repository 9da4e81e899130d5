// ============================================================================
// Book Factory
// Creates books with proper configuration
// ============================================================================

use crate::domain::{BookConfig, BookResult};
use crate::engine::Book;
use crate::interfaces::{EventHandler, NoOpEventHandler};
use crate::numeric::{Price, Quantity};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a book from configuration
///
/// # Example
/// ```
/// use price_time_book::prelude::*;
/// use std::sync::Arc;
///
/// let config = BookConfig::new("ETH").with_tick_size(100u32);
/// let book = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(book.instrument(), "ETH");
/// ```
pub fn create_from_config(
    config: BookConfig,
    event_handler: Arc<dyn EventHandler>,
) -> BookResult<Book> {
    Book::with_config(config, event_handler)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating books with fluent API
///
/// # Example
/// ```
/// use price_time_book::prelude::*;
/// use std::sync::Arc;
///
/// let book = BookBuilder::new("ETH")
///     .with_tick_size(100u32)
///     .with_lot_size(1u32)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert!(book.is_empty());
/// ```
pub struct BookBuilder {
    config: BookConfig,
    event_handler: Arc<dyn EventHandler>,
}

impl BookBuilder {
    /// Create a new builder for the specified instrument
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            config: BookConfig::new(instrument),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Set price tick size
    pub fn with_tick_size(mut self, tick: impl Into<Price>) -> Self {
        self.config = self.config.with_tick_size(tick);
        self
    }

    /// Set lot size
    pub fn with_lot_size(mut self, lot: impl Into<Quantity>) -> Self {
        self.config = self.config.with_lot_size(lot);
        self
    }

    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Get the configuration (for inspection)
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Build the book
    pub fn build(self) -> BookResult<Book> {
        create_from_config(self.config, self.event_handler)
    }
}
