// ============================================================================
// Matching Engine
// Core business logic for order matching
// ============================================================================

use crate::domain::{
    mid_price, now_millis, EngineConfig, LimitOrderPolicy, Order, OrderBook, OrderBookSnapshot,
    OrderId, OrderSummary, OrderType, Quantity, Side, Timestamp, Trade,
};
use crate::engine::price_time::{MatchPass, PriceTimePriority};
use crate::error::{MatchError, MatchResult};
use crate::ingress::{IncomingOrder, OrderRequest, OrderValidator};
use crate::interfaces::{EventHandler, OrderEvent, TradeLedger};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub order_id: OrderId,
    pub filled_quantity: Quantity,
    /// Unfilled quantity; rests only if `resting` is set
    pub remaining_quantity: Quantity,
    /// Whether the remainder was added to the book
    pub resting: bool,
    pub trades: Vec<Trade>,
}

impl MatchOutcome {
    pub fn is_fully_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }
}

/// Single-instrument matching engine.
///
/// The book sits behind one `RwLock`: a submission holds the write guard from
/// the first `best()` read until its trades are in the ledger, so no other
/// submission or query can observe a half-applied match.
pub struct MatchingEngine {
    config: EngineConfig,

    validator: OrderValidator,

    /// Resting orders, both sides
    book: RwLock<OrderBook>,

    /// Append-only record of executed trades
    ledger: Arc<dyn TradeLedger>,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,

    /// Wall-clock source for order and trade timestamps
    clock: fn() -> Timestamp,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new(
        config: EngineConfig,
        ledger: Arc<dyn TradeLedger>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            validator: OrderValidator::from_config(&config),
            config,
            book: RwLock::new(OrderBook::new()),
            ledger,
            event_handler,
            clock: now_millis,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Submit an order to the matching engine.
    ///
    /// Market orders take liquidity until filled or the opposite side runs
    /// out; their remainder is discarded. Limit orders cross first under
    /// `LimitOrderPolicy::CrossThenRest` and rest whatever is left.
    pub fn submit(&self, request: OrderRequest) -> MatchResult<MatchOutcome> {
        let order_id = OrderId::from(request.id.clone());
        let mut events = vec![OrderEvent::OrderReceived {
            order_id: order_id.clone(),
            timestamp: Utc::now(),
        }];

        let result = self
            .validator
            .validate(request)
            .and_then(|incoming| self.execute(incoming, &mut events));

        if let Err(e) = &result {
            tracing::warn!(order_id = %order_id, error = %e, "Order rejected");
            events.push(OrderEvent::OrderRejected {
                order_id,
                reason: e.to_string(),
                timestamp: Utc::now(),
            });
        }

        self.event_handler.on_events(events);
        result
    }

    /// Run one validated order to its terminal state under the write lock
    fn execute(
        &self,
        incoming: IncomingOrder,
        events: &mut Vec<OrderEvent>,
    ) -> MatchResult<MatchOutcome> {
        let rest_price = match incoming.order_type {
            OrderType::Limit => Some(incoming.limit_price.ok_or_else(|| {
                MatchError::InvalidRequest("price must be positive for limit orders".to_string())
            })?),
            OrderType::Market => None,
        };

        let mut book = self.book.write();

        // A resting id can be neither re-inserted nor used as a taker
        if book.contains(&incoming.id) {
            return Err(MatchError::DuplicateOrder(incoming.id));
        }

        let timestamp = book.stamp((self.clock)());
        let mut pass = match (incoming.order_type, self.config.limit_policy) {
            (OrderType::Limit, LimitOrderPolicy::RestOnly) => {
                MatchPass::unmatched(incoming.quantity)
            },
            _ => PriceTimePriority::match_order(&mut book, &incoming, timestamp)?,
        };

        let rested = match rest_price {
            Some(price) if pass.remaining > Decimal::ZERO => {
                let order = Order::new(
                    incoming.id.clone(),
                    incoming.side,
                    price,
                    pass.remaining,
                    timestamp,
                );
                if let Err(e) = book.insert(order).map(|_| ()) {
                    pass.rollback(&mut book);
                    return Err(e);
                }
                Some(price)
            },
            _ => None,
        };

        if !pass.trades.is_empty() {
            if let Err(e) = self.ledger.append_all(&mut pass.trades) {
                tracing::warn!(
                    order_id = %incoming.id,
                    trades = pass.trades.len(),
                    error = %e,
                    "Ledger append failed, rolling back match"
                );
                if rested.is_some() {
                    book.remove(&incoming.id);
                }
                pass.rollback(&mut book);
                return Err(e);
            }
        }

        drop(book);

        let now = Utc::now();
        for trade in &pass.trades {
            events.push(OrderEvent::OrderMatched {
                trade: trade.clone(),
                timestamp: now,
            });
        }
        for maker_id in &pass.removed_makers {
            events.push(OrderEvent::OrderRemovedFromBook {
                order_id: maker_id.clone(),
                timestamp: now,
            });
        }

        if pass.remaining.is_zero() {
            events.push(OrderEvent::OrderFilled {
                order_id: incoming.id.clone(),
                total_filled: pass.filled,
                timestamp: now,
            });
        } else if pass.filled > Decimal::ZERO {
            events.push(OrderEvent::OrderPartiallyFilled {
                order_id: incoming.id.clone(),
                filled_quantity: pass.filled,
                remaining_quantity: pass.remaining,
                timestamp: now,
            });
        }

        match rested {
            Some(price) => events.push(OrderEvent::OrderAddedToBook {
                order_id: incoming.id.clone(),
                price,
                quantity: pass.remaining,
                timestamp: now,
            }),
            None if pass.remaining > Decimal::ZERO => {
                events.push(OrderEvent::RemainderDiscarded {
                    order_id: incoming.id.clone(),
                    quantity: pass.remaining,
                    timestamp: now,
                })
            },
            None => {},
        }

        tracing::info!(
            order_id = %incoming.id,
            side = %incoming.side,
            order_type = %incoming.order_type,
            filled = %pass.filled,
            remaining = %pass.remaining,
            trades = pass.trades.len(),
            resting = rested.is_some(),
            "Order accepted"
        );

        Ok(MatchOutcome {
            order_id: incoming.id,
            filled_quantity: pass.filled,
            remaining_quantity: pass.remaining,
            resting: rested.is_some(),
            trades: pass.trades,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Highest-priority resting order on `side`
    pub fn best(&self, side: Side) -> Option<OrderSummary> {
        self.book.read().best(side).map(Order::summary)
    }

    /// Resting order by id
    pub fn get_order(&self, order_id: &OrderId) -> MatchResult<Order> {
        self.book.read().get(order_id).cloned()
    }

    /// Trades with ledger sequence `>= cursor`
    pub fn list_trades_since(&self, cursor: u64) -> Vec<Trade> {
        self.ledger.list_since(cursor)
    }

    /// Run `f` against a consistent view of the book
    pub fn with_book<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&*self.book.read())
    }

    /// Get order book snapshot
    pub fn get_snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let book = self.book.read();
        OrderBookSnapshot::with_depth(
            self.config.instrument.clone(),
            book.depth(Side::Buy, depth),
            book.depth(Side::Sell, depth),
        )
    }

    /// Get spread
    pub fn get_spread(&self) -> Option<Decimal> {
        let book = self.book.read();
        match (book.best(Side::Buy), book.best(Side::Sell)) {
            (Some(bid), Some(ask)) => ask.price.checked_sub(bid.price),
            _ => None,
        }
    }

    /// Get mid price
    pub fn get_mid_price(&self) -> Option<Decimal> {
        let book = self.book.read();
        match (book.best(Side::Buy), book.best(Side::Sell)) {
            (Some(bid), Some(ask)) => mid_price(bid.price, ask.price),
            _ => None,
        }
    }

    pub fn resting_order_count(&self) -> usize {
        self.book.read().len()
    }

    /// Get the instrument name
    pub fn get_instrument(&self) -> &str {
        &self.config.instrument
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
