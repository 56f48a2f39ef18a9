// ============================================================================
// Trade Domain Model
// ============================================================================

use rust_decimal::Decimal;
use uuid::Uuid;

use super::{OrderId, Price, Quantity, Side, Timestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a matched trade between two orders
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Unique trade identifier
    pub id: Uuid,

    /// Position in the trade ledger; doubles as the `list_since` cursor
    pub sequence: u64,

    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    /// Side of the incoming (aggressive) order
    pub taker_side: Side,

    /// Execution price, always the resting order's price
    pub price: Price,

    /// Executed quantity
    pub quantity: Quantity,

    /// Trade timestamp
    pub timestamp: Timestamp,
}

impl Trade {
    /// Build a trade from the maker and taker ids; buy/sell ids follow from
    /// the taker's side.
    pub fn new(
        sequence: u64,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        let (buy_order_id, sell_order_id) = match taker_side {
            Side::Buy => (taker_order_id, maker_order_id),
            Side::Sell => (maker_order_id, taker_order_id),
        };

        Self {
            id: Uuid::new_v4(),
            sequence,
            buy_order_id,
            sell_order_id,
            taker_side,
            price,
            quantity,
            timestamp,
        }
    }

    /// Order id of the passive order (resting in book)
    pub fn maker_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Buy => &self.sell_order_id,
            Side::Sell => &self.buy_order_id,
        }
    }

    /// Order id of the aggressive order (incoming)
    pub fn taker_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Buy => &self.buy_order_id,
            Side::Sell => &self.sell_order_id,
        }
    }

    /// Notional value of the trade (price * quantity); `None` if it does
    /// not fit in a `Decimal`
    pub fn notional_value(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_ids_follow_taker_side() {
        let trade = Trade::new(
            0,
            OrderId::from("maker"),
            OrderId::from("taker"),
            Side::Sell,
            Decimal::from(100),
            Decimal::from(2),
            1,
        );

        assert_eq!(trade.buy_order_id, OrderId::from("maker"));
        assert_eq!(trade.sell_order_id, OrderId::from("taker"));
        assert_eq!(trade.maker_order_id(), &OrderId::from("maker"));
        assert_eq!(trade.taker_order_id(), &OrderId::from("taker"));
    }

    #[test]
    fn test_notional_value_with_fractional() {
        let trade = Trade::new(
            3,
            OrderId::from("a"),
            OrderId::from("b"),
            Side::Buy,
            Decimal::new(1005, 1), // 100.5
            Decimal::from(2),
            1,
        );

        assert_eq!(trade.buy_order_id, OrderId::from("b"));
        assert_eq!(trade.notional_value(), Some(Decimal::from(201)));
    }

    #[test]
    fn test_notional_value_overflow() {
        let trade = Trade::new(
            0,
            OrderId::from("a"),
            OrderId::from("b"),
            Side::Buy,
            Decimal::MAX,
            Decimal::from(2),
            1,
        );

        assert_eq!(trade.notional_value(), None);
    }
}
