// ============================================================================
// Order Requests
// Typed and wire-shaped forms of an incoming order
// ============================================================================

use crate::domain::{OrderType, Price, Quantity, Side};
use crate::error::{MatchError, MatchResult};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An order as submitted by a client. Consumed once by `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderRequest {
    pub id: String,
    pub side: Side,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub order_type: OrderType,
    /// Required for limit orders, ignored for market orders
    pub price: Option<Price>,
    pub quantity: Quantity,
}

impl OrderRequest {
    pub fn limit(id: impl Into<String>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
        }
    }

    pub fn market(id: impl Into<String>, side: Side, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
        }
    }
}

/// Order request with side and type still as free text, as it arrives on the
/// wire: `{"id":"1","side":"BUY","type":"LIMIT","price":100,"quantity":10}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawOrderRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub side: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub order_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<Price>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quantity: Quantity,
}

impl RawOrderRequest {
    /// Parse a JSON request body
    #[cfg(feature = "serde")]
    pub fn from_json(body: &str) -> MatchResult<Self> {
        serde_json::from_str(body).map_err(|e| MatchError::InvalidRequest(e.to_string()))
    }
}

impl TryFrom<RawOrderRequest> for OrderRequest {
    type Error = MatchError;

    fn try_from(raw: RawOrderRequest) -> Result<Self, Self::Error> {
        let side = raw.side.parse::<Side>().map_err(|_| {
            MatchError::InvalidRequest(format!("invalid order side for {}", raw.side))
        })?;
        let order_type = raw.order_type.parse::<OrderType>()?;

        // A missing limit price is left for validation to reject; a zero market
        // price means "not supplied"
        let price = match order_type {
            OrderType::Limit => Some(raw.price.unwrap_or(Decimal::ZERO)),
            OrderType::Market => raw.price.filter(|p| !p.is_zero()),
        };

        Ok(Self {
            id: raw.id,
            side,
            order_type,
            price,
            quantity: raw.quantity,
        })
    }
}
