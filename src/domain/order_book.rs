// ============================================================================
// Order Book Store
// Price/time ordered side indexes plus the id -> order record store
// ============================================================================

use crossbeam_skiplist::SkipMap;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{Order, OrderId, Price, Quantity, Side, Timestamp};
use crate::error::{MatchError, MatchResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Priority Key
// ============================================================================

/// Sort key for a resting order within its side.
///
/// Bids store the negated price so that both sides sort best-first in
/// ascending key order. Equal prices fall back to timestamp, then to the
/// insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    score: Decimal,
    timestamp: Timestamp,
    sequence: u64,
}

impl PriorityKey {
    fn for_order(order: &Order) -> Self {
        let score = match order.side {
            Side::Buy => -order.price,
            Side::Sell => order.price,
        };

        Self {
            score,
            timestamp: order.timestamp,
            sequence: order.sequence,
        }
    }
}

// ============================================================================
// Order Book Side
// ============================================================================

/// One side of the book (bids or asks).
/// Skip list keyed by priority, so the best order is always at the front.
pub struct OrderBookSide {
    index: SkipMap<PriorityKey, OrderId>,
    pub side: Side,
}

impl OrderBookSide {
    pub fn new(side: Side) -> Self {
        Self {
            index: SkipMap::new(),
            side,
        }
    }

    fn insert(&self, order: &Order) {
        self.index.insert(PriorityKey::for_order(order), order.id.clone());
    }

    fn remove(&self, order: &Order) -> bool {
        self.index.remove(&PriorityKey::for_order(order)).is_some()
    }

    fn contains(&self, order: &Order) -> bool {
        self.index.contains_key(&PriorityKey::for_order(order))
    }

    /// Id of the highest-priority order
    fn best_id(&self) -> Option<OrderId> {
        self.index.front().map(|entry| entry.value().clone())
    }

    /// Ids in priority order
    fn ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.index.iter().map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// ============================================================================
// Order Book Level
// ============================================================================

/// Aggregated quantity resting at one price
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: usize,
}

/// Result of `OrderBook::reduce_or_remove`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// The order keeps resting with this remaining quantity
    Reduced { remaining: Quantity },
    /// The order was exhausted and removed; carries its final record
    Removed(Order),
}

// ============================================================================
// Order Book
// ============================================================================

/// In-memory order book for a single instrument.
///
/// Every order in a side index has exactly one record in `records` and vice
/// versa. All mutation goes through `&mut self`, so callers serialize writers
/// by owning the book behind a lock.
pub struct OrderBook {
    bids: OrderBookSide,
    asks: OrderBookSide,
    records: HashMap<OrderId, Order>,
    next_sequence: u64,
    /// Latest timestamp handed out by `stamp`
    last_timestamp: Timestamp,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: OrderBookSide::new(Side::Buy),
            asks: OrderBookSide::new(Side::Sell),
            records: HashMap::new(),
            next_sequence: 0,
            last_timestamp: Timestamp::MIN,
        }
    }

    fn side(&self, side: Side) -> &OrderBookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Add a resting order.
    ///
    /// Fails with `DuplicateOrder` if the id is resting on either side. The book
    /// assigns the insertion sequence, overwriting whatever the caller set.
    pub fn insert(&mut self, mut order: Order) -> MatchResult<&Order> {
        if self.records.contains_key(&order.id) {
            return Err(MatchError::DuplicateOrder(order.id));
        }
        if order.quantity <= Decimal::ZERO {
            return Err(MatchError::InvalidRequest(format!(
                "resting quantity must be positive for order {}",
                order.id
            )));
        }
        if order.price <= Decimal::ZERO {
            return Err(MatchError::InvalidRequest(format!(
                "resting price must be positive for order {}",
                order.id
            )));
        }

        order.sequence = self.next_sequence;
        self.next_sequence += 1;

        self.side(order.side).insert(&order);
        let id = order.id.clone();
        let stored: &Order = self.records.entry(id).or_insert(order);
        Ok(stored)
    }

    /// Turn a wall-clock reading into a timestamp that never goes backwards.
    ///
    /// A clock step back would otherwise let a later order rank ahead of an
    /// earlier one at the same price.
    pub fn stamp(&mut self, now: Timestamp) -> Timestamp {
        self.last_timestamp = self.last_timestamp.max(now);
        self.last_timestamp
    }

    /// Highest-priority resting order on `side`, if any
    pub fn best(&self, side: Side) -> Option<&Order> {
        self.side(side)
            .best_id()
            .and_then(|id| self.records.get(&id))
    }

    /// Reduce a resting order by `filled_quantity`, removing it from both the
    /// index and the record store once nothing remains.
    ///
    /// A partial reduction keeps the order's position: its key depends only on
    /// price, timestamp and sequence.
    pub fn reduce_or_remove(
        &mut self,
        order_id: &OrderId,
        filled_quantity: Quantity,
    ) -> MatchResult<ReduceOutcome> {
        if filled_quantity <= Decimal::ZERO {
            return Err(MatchError::InvalidRequest(format!(
                "fill quantity must be positive, got {}",
                filled_quantity
            )));
        }

        let order = self
            .records
            .get_mut(order_id)
            .ok_or_else(|| MatchError::RecordNotFound(order_id.clone()))?;

        order.quantity -= filled_quantity;
        if order.quantity > Decimal::ZERO {
            return Ok(ReduceOutcome::Reduced {
                remaining: order.quantity,
            });
        }

        self.remove(order_id)
            .map(ReduceOutcome::Removed)
            .ok_or_else(|| MatchError::RecordNotFound(order_id.clone()))
    }

    /// Drop an order from both the index and the record store
    pub(crate) fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let removed = self.records.remove(order_id)?;
        self.side(removed.side).remove(&removed);
        Some(removed)
    }

    /// Point lookup of a resting order
    pub fn get(&self, order_id: &OrderId) -> MatchResult<&Order> {
        self.records
            .get(order_id)
            .ok_or_else(|| MatchError::RecordNotFound(order_id.clone()))
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.records.contains_key(order_id)
    }

    /// Put back an order exactly as it was before a match pass touched it.
    ///
    /// The order keeps its original sequence, so it regains its old priority.
    pub(crate) fn restore(&mut self, order: Order) {
        let side = self.side(order.side);
        if !side.contains(&order) {
            side.insert(&order);
        }
        self.records.insert(order.id.clone(), order);
    }

    /// Number of resting orders on both sides
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn side_len(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Resting orders on `side`, best first
    pub fn orders(&self, side: Side) -> Vec<&Order> {
        self.side(side)
            .ids()
            .filter_map(|id| self.records.get(&id))
            .collect()
    }

    /// Aggregated depth for up to `num_levels` prices on `side`, best first
    pub fn depth(&self, side: Side, num_levels: usize) -> Vec<OrderBookLevel> {
        let mut levels: Vec<OrderBookLevel> = Vec::new();

        for order in self.orders(side) {
            match levels.last_mut() {
                Some(level) if level.price == order.price => {
                    level.quantity = level.quantity.saturating_add(order.quantity);
                    level.order_count += 1;
                },
                _ => {
                    if levels.len() == num_levels {
                        break;
                    }
                    levels.push(OrderBookLevel {
                        price: order.price,
                        quantity: order.quantity,
                        order_count: 1,
                    });
                },
            }
        }

        levels
    }

    /// Check that the side indexes and the record store agree.
    ///
    /// Holds when every indexed id has a record on the same side with the same
    /// key and positive quantity, and the counts match.
    pub fn is_consistent(&self) -> bool {
        if self.bids.len() + self.asks.len() != self.records.len() {
            return false;
        }

        [&self.bids, &self.asks].iter().all(|side| {
            side.index.iter().all(|entry| {
                self.records.get(entry.value()).is_some_and(|order| {
                    order.side == side.side
                        && order.quantity > Decimal::ZERO
                        && PriorityKey::for_order(order) == *entry.key()
                })
            })
        })
    }
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Immutable snapshot of the order book state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub instrument: String,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
    /// Current spread (ask - bid)
    pub spread: Option<Decimal>,
    pub mid_price: Option<Decimal>,
}

impl OrderBookSnapshot {
    pub fn with_depth(
        instrument: String,
        bids: Vec<OrderBookLevel>,
        asks: Vec<OrderBookLevel>,
    ) -> Self {
        let (spread, mid_price) = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => (
                ask.price.checked_sub(bid.price),
                mid_price(bid.price, ask.price),
            ),
            _ => (None, None),
        };

        Self {
            instrument,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|level| level.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|level| level.price)
    }

    /// Saturates at `Decimal::MAX`
    pub fn total_bid_quantity(&self) -> Decimal {
        total_quantity(&self.bids)
    }

    /// Saturates at `Decimal::MAX`
    pub fn total_ask_quantity(&self) -> Decimal {
        total_quantity(&self.asks)
    }
}

fn total_quantity(levels: &[OrderBookLevel]) -> Decimal {
    levels
        .iter()
        .fold(Decimal::ZERO, |total, level| total.saturating_add(level.quantity))
}

/// Midpoint of `bid` and `ask`, computed from the gap so that prices near
/// `Decimal::MAX` do not overflow
pub fn mid_price(bid: Price, ask: Price) -> Option<Decimal> {
    let half_gap = ask.checked_sub(bid)?.checked_div(Decimal::TWO)?;
    bid.checked_add(half_gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, side: Side, price: i64, qty: i64, ts: Timestamp) -> Order {
        Order::new(id, side, Decimal::from(price), Decimal::from(qty), ts)
    }

    #[test]
    fn test_best_bid_is_highest_price() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Buy, 100, 1, 1)).unwrap();
        book.insert(order("2", Side::Buy, 101, 1, 2)).unwrap();
        book.insert(order("3", Side::Buy, 99, 1, 3)).unwrap();

        assert_eq!(book.best(Side::Buy).unwrap().id, OrderId::from("2"));
        assert!(book.best(Side::Sell).is_none());
    }

    #[test]
    fn test_best_ask_is_lowest_price() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Sell, 100, 1, 1)).unwrap();
        book.insert(order("2", Side::Sell, 99, 1, 2)).unwrap();

        assert_eq!(book.best(Side::Sell).unwrap().id, OrderId::from("2"));
    }

    #[test]
    fn test_equal_price_ranks_by_timestamp_then_insertion() {
        let mut book = OrderBook::new();
        book.insert(order("late", Side::Sell, 100, 1, 20)).unwrap();
        book.insert(order("early", Side::Sell, 100, 1, 10)).unwrap();
        book.insert(order("early-2", Side::Sell, 100, 1, 10)).unwrap();

        let ids: Vec<&str> = book
            .orders(Side::Sell)
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "early-2", "late"]);
    }

    #[test]
    fn test_duplicate_rejected_across_sides() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Buy, 100, 1, 1)).unwrap();

        let err = book.insert(order("1", Side::Sell, 105, 1, 2)).unwrap_err();
        assert_eq!(err, MatchError::DuplicateOrder(OrderId::from("1")));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_non_positive_quantity_never_rests() {
        let mut book = OrderBook::new();
        assert!(matches!(
            book.insert(order("1", Side::Buy, 100, 0, 1)),
            Err(MatchError::InvalidRequest(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_partial_reduce_keeps_priority() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Buy, 100, 10, 1)).unwrap();
        book.insert(order("2", Side::Buy, 100, 10, 2)).unwrap();

        let outcome = book
            .reduce_or_remove(&OrderId::from("1"), Decimal::from(4))
            .unwrap();
        assert_eq!(
            outcome,
            ReduceOutcome::Reduced {
                remaining: Decimal::from(6)
            }
        );

        let best = book.best(Side::Buy).unwrap();
        assert_eq!(best.id, OrderId::from("1"));
        assert_eq!(best.quantity, Decimal::from(6));
        assert!(book.is_consistent());
    }

    #[test]
    fn test_full_reduce_removes_everywhere() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Sell, 100, 5, 1)).unwrap();

        let outcome = book
            .reduce_or_remove(&OrderId::from("1"), Decimal::from(5))
            .unwrap();
        assert!(matches!(outcome, ReduceOutcome::Removed(ref o) if o.quantity.is_zero()));
        assert!(book.is_empty());
        assert_eq!(book.side_len(Side::Sell), 0);
        assert_eq!(
            book.get(&OrderId::from("1")),
            Err(MatchError::RecordNotFound(OrderId::from("1")))
        );
        assert!(book.is_consistent());
    }

    #[test]
    fn test_reduce_unknown_order() {
        let mut book = OrderBook::new();
        assert_eq!(
            book.reduce_or_remove(&OrderId::from("ghost"), Decimal::ONE),
            Err(MatchError::RecordNotFound(OrderId::from("ghost")))
        );
    }

    #[test]
    fn test_id_reusable_after_removal() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Buy, 100, 1, 1)).unwrap();
        book.reduce_or_remove(&OrderId::from("1"), Decimal::ONE)
            .unwrap();

        assert!(book.insert(order("1", Side::Buy, 101, 2, 2)).is_ok());
        assert_eq!(book.get(&OrderId::from("1")).unwrap().price, Decimal::from(101));
    }

    #[test]
    fn test_restore_regains_priority() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Sell, 100, 3, 1)).unwrap();
        book.insert(order("2", Side::Sell, 100, 3, 2)).unwrap();

        let before = book.get(&OrderId::from("1")).unwrap().clone();
        book.reduce_or_remove(&OrderId::from("1"), Decimal::from(3))
            .unwrap();
        assert_eq!(book.best(Side::Sell).unwrap().id, OrderId::from("2"));

        book.restore(before);
        assert_eq!(book.best(Side::Sell).unwrap().id, OrderId::from("1"));
        assert!(book.is_consistent());
    }

    #[test]
    fn test_depth_aggregates_levels() {
        let mut book = OrderBook::new();
        book.insert(order("1", Side::Buy, 100, 1, 1)).unwrap();
        book.insert(order("2", Side::Buy, 100, 2, 2)).unwrap();
        book.insert(order("3", Side::Buy, 99, 4, 3)).unwrap();
        book.insert(order("4", Side::Buy, 98, 8, 4)).unwrap();

        let depth = book.depth(Side::Buy, 2);
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].price, Decimal::from(100));
        assert_eq!(depth[0].quantity, Decimal::from(3));
        assert_eq!(depth[0].order_count, 2);
        assert_eq!(depth[1].price, Decimal::from(99));
    }

    #[test]
    fn test_order_book_snapshot() {
        let level = |price: i64, qty: i64| OrderBookLevel {
            price: Decimal::from(price),
            quantity: Decimal::from(qty),
            order_count: 1,
        };
        let snapshot = OrderBookSnapshot::with_depth(
            "BTC-USD".to_string(),
            vec![level(50000, 1)],
            vec![level(50100, 2)],
        );

        assert_eq!(snapshot.best_bid(), Some(Decimal::from(50000)));
        assert_eq!(snapshot.best_ask(), Some(Decimal::from(50100)));
        assert_eq!(snapshot.spread, Some(Decimal::from(100)));
        assert_eq!(snapshot.mid_price, Some(Decimal::from(50050)));
        assert_eq!(snapshot.total_ask_quantity(), Decimal::from(2));
    }

    #[test]
    fn test_depth_saturates_huge_levels() {
        let mut book = OrderBook::new();
        book.insert(Order::new("1", Side::Sell, Decimal::from(100), Decimal::MAX, 1))
            .unwrap();
        book.insert(Order::new("2", Side::Sell, Decimal::from(100), Decimal::MAX, 2))
            .unwrap();

        let depth = book.depth(Side::Sell, 5);
        assert_eq!(depth.len(), 1);
        assert_eq!(depth[0].quantity, Decimal::MAX);
        assert_eq!(depth[0].order_count, 2);

        let snapshot = OrderBookSnapshot::with_depth("BTC-USD".to_string(), depth.clone(), depth);
        assert_eq!(snapshot.total_ask_quantity(), Decimal::MAX);
    }

    #[test]
    fn test_mid_price_near_decimal_max() {
        let ask = Decimal::MAX;
        assert_eq!(mid_price(ask - Decimal::TWO, ask), Some(ask - Decimal::ONE));

        // An odd gap needs one more digit than fits; rounding is fine, panicking is not
        let bid = ask - Decimal::ONE;
        if let Some(mid) = mid_price(bid, ask) {
            assert!(mid >= bid && mid <= ask);
        }
        assert_eq!(mid_price(Decimal::from(100), Decimal::from(101)), Some(Decimal::new(1005, 1)));
        // A crossed book still has a midpoint
        assert_eq!(mid_price(Decimal::from(102), Decimal::from(100)), Some(Decimal::from(101)));
    }

    #[test]
    fn test_stamp_never_goes_backwards() {
        let mut book = OrderBook::new();
        assert_eq!(book.stamp(1000), 1000);
        assert_eq!(book.stamp(990), 1000);
        assert_eq!(book.stamp(1005), 1005);
    }
}
