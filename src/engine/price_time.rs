// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// Most common in traditional exchanges (NASDAQ, NYSE, etc.)
// ============================================================================

use crate::domain::{Order, OrderBook, OrderId, Price, Quantity, ReduceOutcome, Side, Timestamp, Trade};
use crate::error::MatchResult;
use crate::ingress::IncomingOrder;
use rust_decimal::Decimal;

/// Price/Time Priority (FIFO) matching algorithm
///
/// Orders at the same price level are matched in time priority order, and
/// every trade executes at the resting order's price.
///
/// # Example
/// ```text
/// Book:  100 @ 10 (Buy 1, t=100)
///        100 @  5 (Buy 2, t=101)
///
/// Incoming: Market Sell 12
/// Result: 10 with Buy 1 (removed), then 2 with Buy 2 (3 left resting)
/// ```
pub struct PriceTimePriority;

/// Everything one incoming order did to the book.
///
/// The book has already been mutated when a pass is returned; `rollback`
/// undoes it if the trades cannot be committed.
#[derive(Debug)]
pub struct MatchPass {
    pub trades: Vec<Trade>,
    pub filled: Quantity,
    pub remaining: Quantity,
    /// Makers exhausted by this pass, in match order
    pub removed_makers: Vec<OrderId>,
    /// Maker records as they were before this pass touched them
    journal: Vec<Order>,
}

impl MatchPass {
    /// A pass that never looked at the book
    pub fn unmatched(quantity: Quantity) -> Self {
        Self {
            trades: Vec::new(),
            filled: Decimal::ZERO,
            remaining: quantity,
            removed_makers: Vec::new(),
            journal: Vec::new(),
        }
    }

    /// Restore every maker this pass touched, newest change first
    pub fn rollback(self, book: &mut OrderBook) {
        for order in self.journal.into_iter().rev() {
            book.restore(order);
        }
    }
}

impl PriceTimePriority {
    /// Match `incoming` against the opposite side of `book`.
    ///
    /// Stops when the incoming quantity is exhausted, the opposite side is
    /// empty, or (for limit orders) the best opposite price no longer crosses.
    /// Trades are numbered from zero within the pass; the ledger renumbers
    /// them when they are appended.
    pub fn match_order(
        book: &mut OrderBook,
        incoming: &IncomingOrder,
        timestamp: Timestamp,
    ) -> MatchResult<MatchPass> {
        let maker_side = incoming.side.opposite();
        let mut pass = MatchPass::unmatched(incoming.quantity);

        while pass.remaining > Decimal::ZERO {
            let maker = match book.best(maker_side) {
                Some(order) => order.clone(),
                None => break,
            };

            if !Self::prices_cross(incoming.side, incoming.limit_price, maker.price) {
                break;
            }

            let trade_quantity = pass.remaining.min(maker.quantity);

            let outcome = match book.reduce_or_remove(&maker.id, trade_quantity) {
                Ok(outcome) => outcome,
                Err(e) => {
                    pass.rollback(book);
                    return Err(e);
                },
            };

            pass.trades.push(Trade::new(
                pass.trades.len() as u64,
                maker.id.clone(),
                incoming.id.clone(),
                incoming.side,
                maker.price,
                trade_quantity,
                timestamp,
            ));
            pass.filled += trade_quantity;
            pass.remaining -= trade_quantity;

            if let ReduceOutcome::Removed(_) = outcome {
                pass.removed_makers.push(maker.id.clone());
            }
            pass.journal.push(maker);
        }

        Ok(pass)
    }

    /// Whether an incoming order on `side` with `limit` may trade at
    /// `book_price`. Market orders (no limit) always cross.
    pub fn prices_cross(side: Side, limit: Option<Price>, book_price: Price) -> bool {
        match (side, limit) {
            (_, None) => true,
            (Side::Buy, Some(limit)) => limit >= book_price,
            (Side::Sell, Some(limit)) => limit <= book_price,
        }
    }
}
