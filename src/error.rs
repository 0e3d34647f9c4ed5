// error types for configuration, order validation and exchange access.
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API credentials not found in environment variables ({0} is not set)")]
    MissingCredentials(&'static str),

    #[error("failed to load config file {path}: {reason}")]
    File { path: String, reason: String },

    #[error("malformed endpoint entry {0:?}, expected NAME=/path")]
    BadEndpoint(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Symbol must not be empty")]
    EmptySymbol,

    #[error("Side must be BUY or SELL")]
    InvalidSide(String),

    #[error("Order type must be MARKET, LIMIT, or STOP_LIMIT")]
    InvalidOrderType(String),

    #[error("Quantity must be greater than 0")]
    NonPositiveQuantity,

    #[error("Price is required for LIMIT and STOP_LIMIT orders")]
    MissingPrice,

    #[error("Price must be greater than 0")]
    NonPositivePrice,

    #[error("stop_price is required for STOP_LIMIT orders")]
    MissingStopPrice,

    #[error("Stop price must be greater than 0")]
    NonPositiveStopPrice,

    #[error("Order notional too small: {notional:.2} USDT. Minimum required: {min_notional} USDT")]
    NotionalTooSmall {
        notional: Decimal,
        min_notional: Decimal,
    },

    #[error("Order notional is too large to compute: {quantity} x {mark_price}")]
    NotionalOverflow {
        quantity: Decimal,
        mark_price: Decimal,
    },

    #[error("{label} band is too large to compute for mark price {mark}")]
    BandOverflow { label: &'static str, mark: Decimal },

    #[error("{label} must be between {min} and {max}")]
    OutOfRange {
        label: &'static str,
        min: Decimal,
        max: Decimal,
    },

    #[error("{label} must be between {lower:.2} and {upper:.2} (mark price: {mark:.2})")]
    OutsideBand {
        label: &'static str,
        lower: Decimal,
        upper: Decimal,
        mark: Decimal,
    },
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("exchange rejected request (HTTP {status}, code {code}): {msg}")]
    Rejected { status: u16, code: i64, msg: String },

    #[error("failed to decode exchange response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Symbol {0} not found")]
    UnknownSymbol(String),

    #[error("symbol {symbol} has no {filter} filter")]
    MissingFilter {
        symbol: String,
        filter: &'static str,
    },

    #[error("no {0} endpoint configured")]
    MissingEndpoint(&'static str),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("failed to start logging: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}
