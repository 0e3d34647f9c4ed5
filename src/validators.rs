// Input checks run before anything is sent to the exchange.
use crate::error::ValidationError;
use crate::order::{OrderType, Side};

use rust_decimal::Decimal;

pub fn validate_symbol(symbol: &str) -> Result<String, ValidationError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    Ok(symbol)
}

pub fn validate_side(side: &str) -> Result<Side, ValidationError> {
    side.parse()
}

pub fn validate_order_type(order_type: &str) -> Result<OrderType, ValidationError> {
    order_type.parse()
}

pub fn validate_quantity(quantity: Decimal) -> Result<Decimal, ValidationError> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity);
    }
    Ok(quantity)
}

// Price is only kept for order types that use it.
pub fn validate_price(
    price: Option<Decimal>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if !order_type.requires_price() {
        return Ok(None);
    }

    match price {
        None => Err(ValidationError::MissingPrice),
        Some(p) if p <= Decimal::ZERO => Err(ValidationError::NonPositivePrice),
        Some(p) => Ok(Some(p)),
    }
}

pub fn validate_stop_price(
    stop_price: Option<Decimal>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if !order_type.requires_stop_price() {
        return Ok(None);
    }

    match stop_price {
        None => Err(ValidationError::MissingStopPrice),
        Some(p) if p <= Decimal::ZERO => Err(ValidationError::NonPositiveStopPrice),
        Some(p) => Ok(Some(p)),
    }
}
