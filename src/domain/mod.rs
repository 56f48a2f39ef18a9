// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod order;
pub mod order_book;
pub mod trade;

pub use config::{EngineConfig, LimitOrderPolicy};
pub use order::{
    now_millis, Order, OrderId, OrderSummary, OrderType, Price, Quantity, Side, Timestamp,
};
pub use order_book::{
    mid_price, OrderBook, OrderBookLevel, OrderBookSide, OrderBookSnapshot, ReduceOutcome,
};
pub use trade::Trade;
