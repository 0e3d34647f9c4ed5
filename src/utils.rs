use hmac::{Hmac, Mac};
use sha2::Sha256;

use flexi_logger::{
    detailed_format, Age, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle,
    Naming,
};

fn get_hmac(secret: &str, input: &str) -> String {
    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take a key of any size");
    mac.update(input.as_bytes());
    let hash_msg = mac.finalize().into_bytes();
    hex::encode(hash_msg)
}

// Join parameters as k=v pairs in insertion order. The exchange verifies the
// signature against the exact string it receives, so this is also the string
// that gets sent.
pub fn build_query(params: &[(&str, String)]) -> String {
    let queryparts: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    queryparts.join("&")
}

pub fn sign_query(secret: &str, query: &str) -> String {
    get_hmac(secret, query)
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// The returned handle must live until the program exits, dropping it stops
// the file writer.
pub fn init_logging(logdir: &str, logspec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_str(logspec)?
        .log_to_file(
            FileSpec::default()
                .directory(logdir)
                .basename("trading")
                .suppress_timestamp(),
        )
        .append()
        .format(detailed_format)
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(7),
        )
        .start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_binance_docs() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign_query(secret, query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn query_keeps_insertion_order() {
        let params = vec![
            ("symbol", "BTCUSDT".to_string()),
            ("side", "BUY".to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", "0.01".to_string()),
        ];
        assert_eq!(
            build_query(&params),
            "symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.01"
        );
    }

    #[test]
    fn empty_query() {
        assert_eq!(build_query(&[]), "");
    }
}
