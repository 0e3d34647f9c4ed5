mod binance;
mod config;
mod error;
mod exchange;
mod exchangeinfo;
mod order;
mod price;
mod service;
mod utils;
mod validators;

use binance::Binance;
use clap::Parser;
use config::Credentials;
use error::Error;
use log::{error, info};
use order::{OrderRequest, OrderType};
use rust_decimal::Decimal;
use service::{OrderResult, OrderService};

use std::path::PathBuf;
use std::process::ExitCode;

/// Binance Futures Testnet Trading Bot
#[derive(Parser, Debug)]
#[command(name = "futures-order", version)]
struct Args {
    /// Futures symbol, e.g. BTCUSDT
    #[arg(long)]
    symbol: String,

    /// BUY or SELL
    #[arg(long)]
    side: String,

    /// MARKET, LIMIT or STOP_LIMIT
    #[arg(long = "type")]
    order_type: String,

    #[arg(long)]
    quantity: Decimal,

    /// Limit price, required for LIMIT and STOP_LIMIT
    #[arg(long)]
    price: Option<Decimal>,

    /// Trigger price, required for STOP_LIMIT
    #[arg(long)]
    stop_price: Option<Decimal>,

    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

// Blank or missing response fields are shown as N/A.
fn display(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => String::from("N/A"),
    }
}

// Report figures are rounded to cents, plain {:.2} would truncate.
fn cents(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn print_banner(title: &str) {
    println!("\n==============================");
    println!("{}", title);
    println!("==============================");
}

fn print_request(args: &Args) {
    print_banner("ORDER REQUEST");
    println!("Symbol   : {}", args.symbol.to_uppercase());
    println!("Side     : {}", args.side.to_uppercase());
    println!("Type     : {}", args.order_type.to_uppercase());
    println!("Quantity : {}", args.quantity);

    let fmt_opt = |v: Option<Decimal>| display(v.map(|d| d.to_string()));
    match args.order_type.parse::<OrderType>() {
        Ok(OrderType::Limit) => {
            println!("Input Price : {}", fmt_opt(args.price));
        }
        Ok(OrderType::StopLimit) => {
            println!("Input Price     : {}", fmt_opt(args.price));
            println!("Input Stop Price: {}", fmt_opt(args.stop_price));
        }
        _ => {}
    }
}

fn print_result(result: &OrderResult) {
    let response = &result.response;

    print_banner("ORDER RESPONSE");
    println!("Order ID     : {}", display(response.order_id()));
    println!("Status       : {}", display(response.status()));

    if response.has("executedQty") {
        println!("ExecutedQty  : {}", display(response.field("executedQty")));
    }
    if response.has("avgPrice") {
        println!("Avg Price    : {}", display(response.field("avgPrice")));
    }

    println!("Mark Price   : {}", cents(result.mark_price));
    println!("Notional     : {} USDT", cents(result.notional));

    if let Some(final_price) = result.final_price {
        println!("Final Price  : {}", final_price);
    }

    println!("\nOrder placed successfully");
}

fn run(args: &Args, cfg: &config::Config) -> Result<(), Error> {
    let credentials = Credentials::from_env()?;
    let bex = Binance::new(cfg.exchange.clone(), credentials)?;
    info!("connected to {} at {}", bex.config.name, bex.config.uri);

    let service = OrderService::new(&bex);

    print_request(args);

    let request = OrderRequest {
        symbol: args.symbol.clone(),
        side: args.side.clone(),
        order_type: args.order_type.clone(),
        quantity: args.quantity,
        price: args.price,
        stop_price: args.stop_price,
    };
    let result = service.place_order(&request)?;

    print_result(&result);
    Ok(())
}

// Everything the user does not see goes to the log, including each
// underlying cause.
fn log_failure(err: &Error) {
    error!("Order failed: {:?}", err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = std::error::Error::source(cause);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::new(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _logger = match utils::init_logging(&cfg.log_dir, &cfg.log_spec) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{}", Error::from(e));
            return ExitCode::FAILURE;
        }
    };

    info!("starting up, loaded configuration from {:?}.", args.config);

    match run(&args, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_failure(&e);
            println!("\nOrder Failed");
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_replaces_blank_values() {
        assert_eq!(display(None), "N/A");
        assert_eq!(display(Some("  ".to_string())), "N/A");
        assert_eq!(display(Some("NEW".to_string())), "NEW");
    }

    #[test]
    fn report_figures_round_to_cents() {
        use rust_decimal_macros::dec;

        assert_eq!(cents(dec!(4.999)), "5.00");
        assert_eq!(cents(dec!(100)), "100.00");
        assert_eq!(cents(dec!(60000.126)), "60000.13");
        assert_eq!(cents(dec!(0.5)), "0.50");
    }

    #[test]
    fn parses_stop_limit_flags() {
        let args = Args::try_parse_from([
            "futures-order",
            "--symbol",
            "btcusdt",
            "--side",
            "sell",
            "--type",
            "stop_limit",
            "--quantity",
            "0.002",
            "--price",
            "61000.5",
            "--stop-price",
            "61100",
        ])
        .unwrap();
        assert_eq!(args.order_type, "stop_limit");
        assert_eq!(args.quantity.to_string(), "0.002");
        assert_eq!(args.price.map(|p| p.to_string()).as_deref(), Some("61000.5"));
        assert_eq!(args.stop_price.map(|p| p.to_string()).as_deref(), Some("61100"));
        assert_eq!(args.config, PathBuf::from(config::DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn required_flags_are_enforced() {
        let missing_quantity = Args::try_parse_from([
            "futures-order",
            "--symbol",
            "BTCUSDT",
            "--side",
            "BUY",
            "--type",
            "MARKET",
        ]);
        assert!(missing_quantity.is_err());

        let bad_quantity = Args::try_parse_from([
            "futures-order",
            "--symbol",
            "BTCUSDT",
            "--side",
            "BUY",
            "--type",
            "MARKET",
            "--quantity",
            "lots",
        ]);
        assert!(bad_quantity.is_err());
    }
}
