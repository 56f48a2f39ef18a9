// ============================================================================
// Engine Configuration
// Instrument, limit order policy and price/quantity increments
// ============================================================================

use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Limit Order Policy
// ============================================================================

/// How an incoming limit order is treated before it rests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LimitOrderPolicy {
    /// Match against the opposite side while prices cross, then rest the
    /// remainder (standard exchange behavior)
    #[default]
    CrossThenRest,

    /// Always rest without looking at the opposite side. The book may end up
    /// crossed; only market orders ever trade.
    RestOnly,
}

// ============================================================================
// Engine Configuration
// ============================================================================

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// The trading instrument (e.g., "BTC-USD")
    pub instrument: String,

    pub limit_policy: LimitOrderPolicy,

    /// Optional: Price tick size (minimum price increment)
    /// None means no tick size enforcement
    pub tick_size: Option<Decimal>,

    /// Optional: Lot size (minimum quantity increment)
    /// None means no lot size enforcement
    pub lot_size: Option<Decimal>,
}

impl EngineConfig {
    pub fn new(instrument: String, limit_policy: LimitOrderPolicy) -> Self {
        Self {
            instrument,
            limit_policy,
            tick_size: None,
            lot_size: None,
        }
    }

    /// Builder method: Set price tick size
    pub fn with_tick_size(mut self, tick: Decimal) -> Self {
        self.tick_size = Some(tick);
        self
    }

    /// Builder method: Set lot size
    pub fn with_lot_size(mut self, lot: Decimal) -> Self {
        self.lot_size = Some(lot);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.instrument.is_empty() {
            return Err("Instrument cannot be empty".to_string());
        }

        if let Some(tick) = self.tick_size {
            if tick <= Decimal::ZERO {
                return Err("Tick size must be positive".to_string());
            }
        }

        if let Some(lot) = self.lot_size {
            if lot <= Decimal::ZERO {
                return Err("Lot size must be positive".to_string());
            }
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl EngineConfig {
    /// Limit orders cross the book before resting
    pub fn standard(instrument: String) -> Self {
        Self::new(instrument, LimitOrderPolicy::CrossThenRest)
    }

    /// Limit orders always rest; only market orders take liquidity
    pub fn rest_only(instrument: String) -> Self {
        Self::new(instrument, LimitOrderPolicy::RestOnly)
    }
}
