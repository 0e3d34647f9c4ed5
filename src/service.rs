// Validate an order against the symbol's exchange filters and submit it.
use crate::error::{Error, ValidationError};
use crate::exchange::Exchange;
use crate::exchangeinfo::SymbolFilters;
use crate::order::{OrderParams, OrderRequest, OrderResponse, TimeInForce};
use crate::validators::{
    validate_order_type, validate_price, validate_quantity, validate_side, validate_stop_price,
    validate_symbol,
};

use log::{info, warn};
use rust_decimal::Decimal;

#[derive(Debug)]
pub struct OrderResult {
    pub response: OrderResponse,
    pub mark_price: Decimal,
    pub notional: Decimal,
    pub final_price: Option<Decimal>,
}

pub struct OrderService<'a> {
    exchange: &'a dyn Exchange,
}

// Round down to a multiple of tick_size. A zero tick size means the
// exchange does not constrain the increment.
pub fn round_to_tick(price: Decimal, tick_size: Decimal) -> Decimal {
    if tick_size <= Decimal::ZERO {
        return price;
    }
    (price - price % tick_size).normalize()
}

// Price range and percent band, both bounds inclusive.
fn check_price(
    label: &'static str,
    price: Decimal,
    mark_price: Decimal,
    filters: &SymbolFilters,
) -> Result<(), ValidationError> {
    // maxPrice of 0 disables the upper limit.
    let above_max = !filters.max_price.is_zero() && price > filters.max_price;
    if price < filters.min_price || above_max {
        return Err(ValidationError::OutOfRange {
            label,
            min: filters.min_price,
            max: filters.max_price,
        });
    }

    let overflow = || ValidationError::BandOverflow {
        label,
        mark: mark_price,
    };
    let lower = mark_price
        .checked_mul(filters.multiplier_down)
        .ok_or_else(overflow)?;
    let upper = mark_price
        .checked_mul(filters.multiplier_up)
        .ok_or_else(overflow)?;
    if price < lower || price > upper {
        return Err(ValidationError::OutsideBand {
            label,
            lower,
            upper,
            mark: mark_price,
        });
    }

    Ok(())
}

impl<'a> OrderService<'a> {
    pub fn new(exchange: &'a dyn Exchange) -> OrderService<'a> {
        OrderService { exchange }
    }

    pub fn place_order(&self, request: &OrderRequest) -> Result<OrderResult, Error> {
        let symbol = validate_symbol(&request.symbol)?;
        let side = validate_side(&request.side)?;
        let order_type = validate_order_type(&request.order_type)?;
        let quantity = validate_quantity(request.quantity)?;
        let price = validate_price(request.price, order_type)?;
        let stop_price = validate_stop_price(request.stop_price, order_type)?;

        if request.price.is_some() && price.is_none() {
            warn!("ignoring price for {} order", order_type);
        }

        let mark_price = self.exchange.get_mark_price(&symbol)?;
        let filters = self.exchange.get_symbol_filters(&symbol)?;

        info!("Mark price: {}", mark_price);

        let notional = mark_price
            .checked_mul(quantity)
            .ok_or(ValidationError::NotionalOverflow {
                quantity,
                mark_price,
            })?;
        if notional < filters.min_notional {
            return Err(ValidationError::NotionalTooSmall {
                notional,
                min_notional: filters.min_notional,
            }
            .into());
        }

        let final_price = match price {
            Some(p) => {
                let rounded = round_to_tick(p, filters.tick_size);
                check_price("Price", rounded, mark_price, &filters)?;
                Some(rounded)
            }
            None => None,
        };

        let final_stop_price = match stop_price {
            Some(sp) => {
                let rounded = round_to_tick(sp, filters.tick_size);
                check_price("Stop price", rounded, mark_price, &filters)?;
                Some(rounded)
            }
            None => None,
        };

        let params = OrderParams {
            symbol,
            side,
            order_type,
            quantity,
            price: final_price,
            time_in_force: if order_type.requires_price() {
                Some(TimeInForce::Gtc)
            } else {
                None
            },
            stop_price: final_stop_price,
        };

        info!("Validated order params: {}", params);

        let response = self.exchange.create_order(&params)?;

        Ok(OrderResult {
            response,
            mark_price,
            notional,
            final_price,
        })
    }
}
