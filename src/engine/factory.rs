// ============================================================================
// Matching Engine Factory
// Creates matching engines with proper configuration
// ============================================================================

use crate::domain::{EngineConfig, LimitOrderPolicy};
use crate::engine::MatchingEngine;
use crate::interfaces::{EventHandler, TradeLedger};
use crate::ledger::InMemoryTradeLedger;
use rust_decimal::Decimal;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a matching engine backed by an in-memory trade ledger
///
/// # Example
/// ```
/// use order_matcher::prelude::*;
/// use std::sync::Arc;
///
/// let config = EngineConfig::standard("AAPL".to_string());
/// let engine = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(engine.get_instrument(), "AAPL");
/// ```
pub fn create_from_config(
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> Result<MatchingEngine, String> {
    create_with_ledger(config, Arc::new(InMemoryTradeLedger::new()), event_handler)
}

/// Creates a matching engine that records trades in `ledger`
pub fn create_with_ledger(
    config: EngineConfig,
    ledger: Arc<dyn TradeLedger>,
    event_handler: Arc<dyn EventHandler>,
) -> Result<MatchingEngine, String> {
    config.validate()?;

    tracing::debug!(
        instrument = %config.instrument,
        policy = ?config.limit_policy,
        "Creating matching engine"
    );

    Ok(MatchingEngine::new(config, ledger, event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating matching engines with fluent API
///
/// # Example
/// ```
/// use order_matcher::prelude::*;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let engine = MatchingEngineBuilder::new("BTC-USD")
///     .cross_limit_orders()
///     .with_tick_size(Decimal::new(1, 2))
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(engine.get_instrument(), "BTC-USD");
/// ```
pub struct MatchingEngineBuilder {
    config: EngineConfig,
    ledger: Option<Arc<dyn TradeLedger>>,
}

impl MatchingEngineBuilder {
    /// Create a new builder for the specified instrument
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            config: EngineConfig::standard(instrument.into()),
            ledger: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            ledger: None,
        }
    }

    /// Limit orders match while they cross, then rest (default)
    pub fn cross_limit_orders(mut self) -> Self {
        self.config.limit_policy = LimitOrderPolicy::CrossThenRest;
        self
    }

    /// Limit orders always rest without matching
    pub fn rest_only_limit_orders(mut self) -> Self {
        self.config.limit_policy = LimitOrderPolicy::RestOnly;
        self
    }

    /// Set price tick size
    pub fn with_tick_size(mut self, tick_size: Decimal) -> Self {
        self.config.tick_size = Some(tick_size);
        self
    }

    /// Set lot size
    pub fn with_lot_size(mut self, lot_size: Decimal) -> Self {
        self.config.lot_size = Some(lot_size);
        self
    }

    /// Record trades in `ledger` instead of a fresh in-memory one.
    ///
    /// The ledger numbers trades itself, so one ledger may back several
    /// engines.
    pub fn with_ledger(mut self, ledger: Arc<dyn TradeLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Build the matching engine
    pub fn build(self, event_handler: Arc<dyn EventHandler>) -> Result<MatchingEngine, String> {
        match self.ledger {
            Some(ledger) => create_with_ledger(self.config, ledger, event_handler),
            None => create_from_config(self.config, event_handler),
        }
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}
