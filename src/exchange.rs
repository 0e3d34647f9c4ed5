use crate::error::ExchangeError;
use crate::exchangeinfo::SymbolFilters;
use crate::order::{OrderParams, OrderResponse};

use rust_decimal::Decimal;

pub trait Exchange {
    fn create_order(&self, params: &OrderParams) -> Result<OrderResponse, ExchangeError>;

    fn get_mark_price(&self, symbol: &str) -> Result<Decimal, ExchangeError>;

    fn get_symbol_filters(&self, symbol: &str) -> Result<SymbolFilters, ExchangeError>;
}
