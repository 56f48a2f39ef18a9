// ============================================================================
// Order Ingress
// Shape validation and routing of incoming order requests
// ============================================================================

mod request;

pub use request::{OrderRequest, RawOrderRequest};

use crate::domain::{EngineConfig, OrderId, OrderType, Price, Quantity, Side};
use crate::error::{MatchError, MatchResult};
use rust_decimal::Decimal;

/// A request that passed validation; limit orders always carry a price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingOrder {
    pub id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub limit_price: Option<Price>,
    pub quantity: Quantity,
}

/// Validates requests before they reach the book
#[derive(Debug, Clone, Default)]
pub struct OrderValidator {
    tick_size: Option<Decimal>,
    lot_size: Option<Decimal>,
}

impl OrderValidator {
    pub fn new(tick_size: Option<Decimal>, lot_size: Option<Decimal>) -> Self {
        // Zero increments disable the check instead of dividing by zero
        Self {
            tick_size: tick_size.filter(|t| !t.is_zero()),
            lot_size: lot_size.filter(|l| !l.is_zero()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.tick_size, config.lot_size)
    }

    /// Check the request's shape. Never touches the book.
    pub fn validate(&self, request: OrderRequest) -> MatchResult<IncomingOrder> {
        if request.id.trim().is_empty() {
            return Err(invalid("order ID is required"));
        }

        if request.quantity <= Decimal::ZERO {
            return Err(invalid("quantity must be positive"));
        }

        if let Some(lot) = self.lot_size {
            if !(request.quantity % lot).is_zero() {
                return Err(MatchError::InvalidRequest(format!(
                    "quantity {} is not a multiple of lot size {}",
                    request.quantity, lot
                )));
            }
        }

        let limit_price = match request.order_type {
            OrderType::Limit => {
                let price = request
                    .price
                    .filter(|p| *p > Decimal::ZERO)
                    .ok_or_else(|| invalid("price must be positive for limit orders"))?;

                if let Some(tick) = self.tick_size {
                    if !(price % tick).is_zero() {
                        return Err(MatchError::InvalidRequest(format!(
                            "price {} is not a multiple of tick size {}",
                            price, tick
                        )));
                    }
                }

                Some(price)
            },
            OrderType::Market => None,
        };

        Ok(IncomingOrder {
            id: OrderId::from(request.id),
            side: request.side,
            order_type: request.order_type,
            limit_price,
            quantity: request.quantity,
        })
    }
}

fn invalid(reason: &str) -> MatchError {
    MatchError::InvalidRequest(reason.to_string())
}
