// Binance USDT-M futures REST client.
use crate::config::{Credentials, ExchangeConfig};
use crate::error::ExchangeError;
use crate::exchange::Exchange;
use crate::exchangeinfo::{ExchangeInfo, SymbolFilters};
use crate::order::{OrderParams, OrderResponse};
use crate::price::{MarkPrice, ServerTime};
use crate::utils;

use log::{debug, error, info};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Debug)]
pub struct Binance {
    pub config: ExchangeConfig,
    credentials: Credentials,
    client: reqwest::blocking::Client,
    // Server time minus local time, added to every signed timestamp.
    time_offset_ms: i64,
}

impl Binance {
    // Syncs the local clock against the server once, a skewed timestamp gets
    // signed requests rejected with -1021.
    pub fn new(config: ExchangeConfig, credentials: Credentials) -> Result<Binance, ExchangeError> {
        let mut bex = Binance {
            config,
            credentials,
            client: reqwest::blocking::Client::new(),
            time_offset_ms: 0,
        };

        let server_time: ServerTime = bex.get_public("TIME", &[])?;
        bex.time_offset_ms = server_time.serverTime - utils::now_ms();
        debug!("timestamp offset: {}ms", bex.time_offset_ms);

        Ok(bex)
    }

    fn endpoint(&self, name: &'static str) -> Result<String, ExchangeError> {
        match self.config.endpoints_map.get(name) {
            Some(ep) => Ok(format!("{}{}", self.config.uri, ep)),
            None => Err(ExchangeError::MissingEndpoint(name)),
        }
    }

    fn get_public<T: DeserializeOwned>(
        &self,
        name: &'static str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let query = utils::build_query(params);
        let mut uri = self.endpoint(name)?;
        if !query.is_empty() {
            uri = format!("{}?{}", uri, query);
        }

        let resp = self
            .client
            .get(&uri)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()?;

        let status = resp.status().as_u16();
        let body = resp.text()?;
        decode_response(status, &body)
    }

    fn post_signed<T: DeserializeOwned>(
        &self,
        name: &'static str,
        params: Vec<(&str, String)>,
    ) -> Result<T, ExchangeError> {
        let timestamp = utils::now_ms() + self.time_offset_ms;
        let query = signed_query(
            &self.credentials.api_secret,
            params,
            self.config.recv_window,
            timestamp,
        );
        let uri = format!("{}?{}", self.endpoint(name)?, query);

        let resp = self
            .client
            .post(&uri)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()?;

        let status = resp.status().as_u16();
        let body = resp.text()?;
        decode_response(status, &body)
    }
}

// Append recvWindow and timestamp, sign everything before the signature.
pub fn signed_query(
    secret: &str,
    mut params: Vec<(&str, String)>,
    recv_window: Option<u64>,
    timestamp: i64,
) -> String {
    if let Some(rw) = recv_window {
        params.push(("recvWindow", rw.to_string()));
    }
    params.push(("timestamp", timestamp.to_string()));

    let query = utils::build_query(&params);
    let signature = utils::sign_query(secret, &query);
    format!("{}&signature={}", query, signature)
}

pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ExchangeError> {
    if !(200..300).contains(&status) {
        return Err(match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(e) => ExchangeError::Rejected {
                status,
                code: e.code,
                msg: e.msg,
            },
            Err(_) => ExchangeError::Rejected {
                status,
                code: 0,
                msg: body.trim().to_string(),
            },
        });
    }

    Ok(serde_json::from_str(body)?)
}

impl Exchange for Binance {
    fn create_order(&self, params: &OrderParams) -> Result<OrderResponse, ExchangeError> {
        info!("Sending order request: {}", params);
        match self.post_signed::<Value>("ORDER", params.to_query()) {
            Ok(raw) => {
                info!("Order response: {}", raw);
                Ok(OrderResponse::new(raw))
            }

            Err(e) => {
                error!("API error while creating order {}: {:?}", params, e);
                Err(e)
            }
        }
    }

    fn get_mark_price(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        let mp: MarkPrice = self.get_public("MARK_PRICE", &[("symbol", symbol.to_string())])?;
        debug!("mark price for {}: {}", mp.symbol, mp.markPrice);
        Ok(mp.markPrice)
    }

    fn get_symbol_filters(&self, symbol: &str) -> Result<SymbolFilters, ExchangeError> {
        let info: ExchangeInfo = self.get_public("EXCHANGE_INFO", &[])?;
        info.symbol_filters(symbol)
    }
}
