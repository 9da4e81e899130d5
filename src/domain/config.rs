// ============================================================================
// Book Configuration
// Instrument identity and order admission rules
// ============================================================================

use super::errors::{BookError, BookResult};
use crate::numeric::{is_multiple_of, Price, Quantity};
use num_traits::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for creating a book
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookConfig {
    /// The trading instrument (e.g., "ETH")
    pub instrument: String,

    /// Optional: Price tick size (minimum price increment)
    /// None means no tick size enforcement
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_size: Option<Price>,

    /// Optional: Lot size (minimum size increment)
    /// None means no lot size enforcement
    #[cfg_attr(feature = "serde", serde(default))]
    pub lot_size: Option<Quantity>,
}

impl BookConfig {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            tick_size: None,
            lot_size: None,
        }
    }

    /// Builder method: Set price tick size
    pub fn with_tick_size(mut self, tick: impl Into<Price>) -> Self {
        self.tick_size = Some(tick.into());
        self
    }

    /// Builder method: Set lot size
    pub fn with_lot_size(mut self, lot: impl Into<Quantity>) -> Self {
        self.lot_size = Some(lot.into());
        self
    }

    /// Parse a configuration from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> BookResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| BookError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> BookResult<()> {
        if self.instrument.trim().is_empty() {
            return Err(BookError::InvalidConfig(
                "instrument cannot be empty".to_string(),
            ));
        }

        if self.tick_size.as_ref().is_some_and(Zero::is_zero) {
            return Err(BookError::InvalidConfig(
                "tick size must be positive".to_string(),
            ));
        }

        if self.lot_size.as_ref().is_some_and(Zero::is_zero) {
            return Err(BookError::InvalidConfig(
                "lot size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Order admission
    // ========================================================================

    /// Check the size of an order about to enter the book
    pub fn check_size(&self, size: &Quantity) -> BookResult<()> {
        if size.is_zero() {
            return Err(BookError::InvalidOrder("size must be positive".to_string()));
        }

        if let Some(lot) = &self.lot_size {
            if !is_multiple_of(size, lot) {
                return Err(BookError::InvalidOrder(format!(
                    "size {size} is not a multiple of lot size {lot}"
                )));
            }
        }

        Ok(())
    }

    /// Check the price of a limit order about to rest
    pub fn check_price(&self, price: &Price) -> BookResult<()> {
        if price.is_zero() {
            return Err(BookError::InvalidOrder("price must be positive".to_string()));
        }

        if let Some(tick) = &self.tick_size {
            if !is_multiple_of(price, tick) {
                return Err(BookError::InvalidOrder(format!(
                    "price {price} is not a multiple of tick size {tick}"
                )));
            }
        }

        Ok(())
    }
}
