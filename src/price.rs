use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Response of the futures premiumIndex endpoint, only the fields we use.
#[derive(Serialize, Deserialize, Debug)]
#[allow(non_snake_case)]
pub struct MarkPrice {
    pub symbol: String,
    pub markPrice: Decimal,
}

#[derive(Serialize, Deserialize, Debug)]
#[allow(non_snake_case)]
pub struct ServerTime {
    pub serverTime: i64,
}
