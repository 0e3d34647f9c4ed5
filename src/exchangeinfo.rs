// Per-symbol trading filters from the futures exchangeInfo endpoint.
use crate::error::ExchangeError;

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "filterType")]
#[allow(non_snake_case)]
pub enum Filter {
    #[serde(rename = "PRICE_FILTER")]
    Price {
        minPrice: Decimal,
        maxPrice: Decimal,
        tickSize: Decimal,
    },

    #[serde(rename = "PERCENT_PRICE")]
    PercentPrice {
        multiplierUp: Decimal,
        multiplierDown: Decimal,
    },

    #[serde(rename = "MIN_NOTIONAL")]
    MinNotional { notional: Decimal },

    // LOT_SIZE, MARKET_LOT_SIZE, MAX_NUM_ORDERS, ...
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
pub struct SymbolInfo {
    pub symbol: String,
    pub filters: Vec<Filter>,
}

#[derive(Deserialize, Debug)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    pub fn symbol_filters(&self, symbol: &str) -> Result<SymbolFilters, ExchangeError> {
        match self.symbols.iter().find(|s| s.symbol == symbol) {
            Some(info) => SymbolFilters::from_filters(symbol, &info.filters),
            None => Err(ExchangeError::UnknownSymbol(symbol.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFilters {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub tick_size: Decimal,
    pub multiplier_up: Decimal,
    pub multiplier_down: Decimal,
    pub min_notional: Decimal,
}

impl SymbolFilters {
    pub fn from_filters(symbol: &str, filters: &[Filter]) -> Result<SymbolFilters, ExchangeError> {
        let missing = |filter| ExchangeError::MissingFilter {
            symbol: symbol.to_string(),
            filter,
        };

        let (min_price, max_price, tick_size) = filters
            .iter()
            .find_map(|f| match f {
                Filter::Price {
                    minPrice,
                    maxPrice,
                    tickSize,
                } => Some((*minPrice, *maxPrice, *tickSize)),
                _ => None,
            })
            .ok_or_else(|| missing("PRICE_FILTER"))?;

        let (multiplier_up, multiplier_down) = filters
            .iter()
            .find_map(|f| match f {
                Filter::PercentPrice {
                    multiplierUp,
                    multiplierDown,
                } => Some((*multiplierUp, *multiplierDown)),
                _ => None,
            })
            .ok_or_else(|| missing("PERCENT_PRICE"))?;

        let min_notional = filters
            .iter()
            .find_map(|f| match f {
                Filter::MinNotional { notional } => Some(*notional),
                _ => None,
            })
            .ok_or_else(|| missing("MIN_NOTIONAL"))?;

        Ok(SymbolFilters {
            min_price,
            max_price,
            tick_size,
            multiplier_up,
            multiplier_down,
            min_notional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXCHANGE_INFO: &str = r#"{
        "timezone": "UTC",
        "serverTime": 1700000000000,
        "symbols": [
            {
                "symbol": "BTCUSDT",
                "pair": "BTCUSDT",
                "contractType": "PERPETUAL",
                "status": "TRADING",
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "261.10", "maxPrice": "809484", "tickSize": "0.10"},
                    {"filterType": "LOT_SIZE", "stepSize": "0.001", "maxQty": "1000", "minQty": "0.001"},
                    {"filterType": "MARKET_LOT_SIZE", "stepSize": "0.001", "maxQty": "120", "minQty": "0.001"},
                    {"filterType": "MAX_NUM_ORDERS", "limit": 200},
                    {"filterType": "MIN_NOTIONAL", "notional": "100"},
                    {"filterType": "PERCENT_PRICE", "multiplierUp": "1.0500", "multiplierDown": "0.9500", "multiplierDecimal": "4"}
                ]
            },
            {
                "symbol": "XYZUSDT",
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "0.001", "maxPrice": "200", "tickSize": "0.001"}
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_filters_for_symbol() {
        let info: ExchangeInfo = serde_json::from_str(EXCHANGE_INFO).unwrap();
        let filters = info.symbol_filters("BTCUSDT").unwrap();
        assert_eq!(
            filters,
            SymbolFilters {
                min_price: dec!(261.10),
                max_price: dec!(809484),
                tick_size: dec!(0.10),
                multiplier_up: dec!(1.05),
                multiplier_down: dec!(0.95),
                min_notional: dec!(100),
            }
        );
    }

    #[test]
    fn unknown_filter_types_are_ignored() {
        let info: ExchangeInfo = serde_json::from_str(EXCHANGE_INFO).unwrap();
        let others = info.symbols[0]
            .filters
            .iter()
            .filter(|f| **f == Filter::Other)
            .count();
        assert_eq!(others, 3);
    }

    #[test]
    fn unknown_symbol() {
        let info: ExchangeInfo = serde_json::from_str(EXCHANGE_INFO).unwrap();
        match info.symbol_filters("DOGEUSDT") {
            Err(ExchangeError::UnknownSymbol(s)) => assert_eq!(s, "DOGEUSDT"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_filter() {
        let info: ExchangeInfo = serde_json::from_str(EXCHANGE_INFO).unwrap();
        match info.symbol_filters("XYZUSDT") {
            Err(ExchangeError::MissingFilter { symbol, filter }) => {
                assert_eq!(symbol, "XYZUSDT");
                assert_eq!(filter, "PERCENT_PRICE");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
