use crate::error::ValidationError;

use rust_decimal::Decimal;
use serde_json::Value;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidSide(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    // Simple market order.
    Market,
    // Limit order.
    Limit,
    // Limit order placed once the stop price trades.
    StopLimit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP_LIMIT",
        }
    }

    // The futures API calls a stop limit order "STOP".
    pub fn exchange_type(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP",
        }
    }

    pub fn requires_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::StopLimit)
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP_LIMIT" => Ok(OrderType::StopLimit),
            _ => Err(ValidationError::InvalidOrderType(s.to_string())),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

// An order as entered by the user, before any normalization.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
}

// Validated parameters ready to be sent to the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub stop_price: Option<Decimal>,
}

impl OrderParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);
        params.push(("symbol", self.symbol.clone()));
        params.push(("side", self.side.as_str().to_string()));
        params.push(("type", self.order_type.exchange_type().to_string()));
        params.push(("quantity", self.quantity.normalize().to_string()));

        if let Some(price) = self.price {
            params.push(("price", price.normalize().to_string()));
        }

        if let Some(tif) = self.time_in_force {
            params.push(("timeInForce", tif.as_str().to_string()));
        }

        if let Some(stop_price) = self.stop_price {
            params.push(("stopPrice", stop_price.normalize().to_string()));
        }

        params
    }
}

impl fmt::Display for OrderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .to_query()
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

// Raw response from the order endpoint. Regular orders carry orderId/status,
// conditional orders routed to the algo service carry algoId/algoStatus.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub raw: Value,
}

impl OrderResponse {
    pub fn new(raw: Value) -> OrderResponse {
        OrderResponse { raw }
    }

    pub fn has(&self, key: &str) -> bool {
        self.raw.get(key).is_some()
    }

    pub fn field(&self, key: &str) -> Option<String> {
        match self.raw.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            v => Some(v.to_string()),
        }
    }

    pub fn order_id(&self) -> Option<String> {
        self.field("orderId").or_else(|| self.field("algoId"))
    }

    pub fn status(&self) -> Option<String> {
        self.field("status").or_else(|| self.field("algoStatus"))
    }
}
