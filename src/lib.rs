// ============================================================================
// Order Matcher Library
// Single-instrument price/time priority matching with an append-only ledger
// ============================================================================

//! # Order Matcher
//!
//! A matching engine for one instrument. Incoming orders are matched against
//! a resting book by price, then time; every trade executes at the resting
//! order's price and is recorded in an append-only trade ledger.
//!
//! ## Features
//!
//! - **Price/time priority** with strict FIFO inside a price level
//! - **Atomic submissions**: a match either commits all its trades and book
//!   updates or none of them
//! - **Pluggable trade ledger** behind the `TradeLedger` trait
//! - **Sequencer** front end that processes submissions from a queue
//!
//! ## Example
//!
//! ```rust
//! use order_matcher::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let engine = MatchingEngineBuilder::new("BTC-USD")
//!     .build(Arc::new(NoOpEventHandler))
//!     .unwrap();
//!
//! engine
//!     .submit(OrderRequest::limit("1", Side::Buy, Decimal::from(100), Decimal::from(10)))
//!     .unwrap();
//!
//! let outcome = engine
//!     .submit(OrderRequest::market("2", Side::Sell, Decimal::from(4)))
//!     .unwrap();
//!
//! assert_eq!(outcome.filled_quantity, Decimal::from(4));
//! assert_eq!(engine.best(Side::Buy).unwrap().quantity, Decimal::from(6));
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod ingress;
pub mod interfaces;
pub mod ledger;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        EngineConfig, LimitOrderPolicy, Order, OrderBook, OrderBookLevel, OrderBookSnapshot,
        OrderId, OrderSummary, OrderType, Side, Trade,
    };
    pub use crate::engine::{
        create_from_config, create_with_ledger, MatchOutcome, MatchingEngine,
        MatchingEngineBuilder, Sequencer, SequencerHandle,
    };
    pub use crate::error::{MatchError, MatchResult};
    pub use crate::ingress::{OrderRequest, RawOrderRequest};
    pub use crate::interfaces::{
        EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent, TradeLedger,
    };
    pub use crate::ledger::InMemoryTradeLedger;
}
