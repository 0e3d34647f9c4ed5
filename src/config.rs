use crate::error::ConfigError;
use ini::Ini;
use log::{debug, log_enabled, Level::Debug};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "conf/futures.ini";

const DEFAULT_NAME: &str = "binance-futures-testnet";
const DEFAULT_URI: &str = "https://testnet.binancefuture.com";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_SPEC: &str = "info";

const DEFAULT_ENDPOINTS: [(&str, &str); 4] = [
    ("TIME", "/fapi/v1/time"),
    ("MARK_PRICE", "/fapi/v1/premiumIndex"),
    ("EXCHANGE_INFO", "/fapi/v1/exchangeInfo"),
    ("ORDER", "/fapi/v1/order"),
];

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub name: String,
    pub uri: String,
    pub recv_window: Option<u64>,
    pub endpoints_map: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub log_dir: String,
    pub log_spec: String,
}

pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

// Keep the secret out of any debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

impl Credentials {
    // Loads .env from the working directory first; variables already set in
    // the environment win.
    pub fn from_env() -> Result<Credentials, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {:?}", path);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &'static str| match lookup(name) {
            Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingCredentials(name)),
        };

        Ok(Credentials {
            api_key: fetch(API_KEY_VAR)?,
            api_secret: fetch(API_SECRET_VAR)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exchange: ExchangeConfig {
                name: DEFAULT_NAME.to_string(),
                uri: DEFAULT_URI.to_string(),
                recv_window: None,
                endpoints_map: default_endpoints(),
            },
            log_dir: DEFAULT_LOG_DIR.to_string(),
            log_spec: DEFAULT_LOG_SPEC.to_string(),
        }
    }
}

fn default_endpoints() -> HashMap<String, String> {
    DEFAULT_ENDPOINTS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// Load configuration from an INI file. When the file is the default one and
// it does not exist the built in defaults are used.
pub fn new(cfg_file_path: &Path) -> Result<Config, ConfigError> {
    if !cfg_file_path.exists() && cfg_file_path == Path::new(DEFAULT_CONFIG_FILE) {
        return Ok(Config::default());
    }

    let inifile = Ini::load_from_file(cfg_file_path).map_err(|e| ConfigError::File {
        path: cfg_file_path.display().to_string(),
        reason: e.to_string(),
    })?;

    from_ini(&inifile)
}

pub fn from_ini(inifile: &Ini) -> Result<Config, ConfigError> {
    if log_enabled!(Debug) {
        debug!("configuration file: ");
        for (section, prop) in inifile.iter() {
            debug!("[{:?}]", section);
            for (k, v) in prop.iter() {
                debug!("{:?}={:?}", k, v);
            }
        }
    }

    let mut config = Config::default();

    if let Some(exchange_section) = inifile.section(Some("Exchange")) {
        if let Some(name) = exchange_section.get("Name") {
            config.exchange.name = name.to_string();
        }

        if let Some(uri) = exchange_section.get("URI") {
            config.exchange.uri = uri.trim_end_matches('/').to_string();
        }

        if let Some(rw) = exchange_section.get("RecvWindow") {
            let recv_window = rw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "RecvWindow",
                value: rw.to_string(),
            })?;
            config.exchange.recv_window = Some(recv_window);
        }

        // This entry looks like EP0=ep0,EP1=ep1, EP0 is the description of the
        // end point and ep0 is the actual rest end point to add to the api uri.
        if let Some(eps) = exchange_section.get("Endpoints") {
            for ep in eps.split(',').map(str::trim).filter(|ep| !ep.is_empty()) {
                match ep.split_once('=') {
                    Some((k, v)) if !k.trim().is_empty() && !v.trim().is_empty() => {
                        config
                            .exchange
                            .endpoints_map
                            .insert(k.trim().to_uppercase(), v.trim().to_string());
                    }
                    _ => return Err(ConfigError::BadEndpoint(ep.to_string())),
                }
            }
        }
    }

    if let Some(logging_section) = inifile.section(Some("Logging")) {
        if let Some(dir) = logging_section.get("Directory") {
            config.log_dir = dir.to_string();
        }

        if let Some(spec) = logging_section.get("Spec") {
            config.log_spec = spec.to_string();
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sections() {
        let ini = Ini::load_from_str("").unwrap();
        let config = from_ini(&ini).unwrap();
        assert_eq!(config.exchange.uri, DEFAULT_URI);
        assert_eq!(config.exchange.recv_window, None);
        assert_eq!(config.exchange.endpoints_map.len(), 4);
        assert_eq!(config.exchange.endpoints_map["ORDER"], "/fapi/v1/order");
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.log_spec, "info");
    }

    #[test]
    fn sections_override_defaults() {
        let ini = Ini::load_from_str(
            "[Exchange]\n\
             Name=binance-futures\n\
             URI=https://fapi.binance.com/\n\
             RecvWindow=5000\n\
             Endpoints=ORDER=/fapi/v1/order/test, mark_price=/fapi/v1/premiumIndex\n\
             [Logging]\n\
             Directory=/tmp/futures-logs\n\
             Spec=debug\n",
        )
        .unwrap();
        let config = from_ini(&ini).unwrap();
        assert_eq!(config.exchange.name, "binance-futures");
        assert_eq!(config.exchange.uri, "https://fapi.binance.com");
        assert_eq!(config.exchange.recv_window, Some(5000));
        assert_eq!(config.exchange.endpoints_map["ORDER"], "/fapi/v1/order/test");
        assert_eq!(
            config.exchange.endpoints_map["MARK_PRICE"],
            "/fapi/v1/premiumIndex"
        );
        assert_eq!(config.exchange.endpoints_map["TIME"], "/fapi/v1/time");
        assert_eq!(config.log_dir, "/tmp/futures-logs");
        assert_eq!(config.log_spec, "debug");
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        let ini = Ini::load_from_str("[Exchange]\nEndpoints=ORDER\n").unwrap();
        match from_ini(&ini) {
            Err(ConfigError::BadEndpoint(ep)) => assert_eq!(ep, "ORDER"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_recv_window_is_rejected() {
        let ini = Ini::load_from_str("[Exchange]\nRecvWindow=soon\n").unwrap();
        assert!(matches!(
            from_ini(&ini),
            Err(ConfigError::InvalidValue { key: "RecvWindow", .. })
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let config = new(Path::new("conf/does-not-exist.ini"));
        assert!(matches!(config, Err(ConfigError::File { .. })));
    }

    #[test]
    fn credentials_from_lookup() {
        let creds = Credentials::from_lookup(|name| match name {
            API_KEY_VAR => Some("key".to_string()),
            API_SECRET_VAR => Some(" secret \n".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.api_secret, "secret");
        assert!(!format!("{:?}", creds).contains("\"secret\""));
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let missing_secret = Credentials::from_lookup(|name| match name {
            API_KEY_VAR => Some("key".to_string()),
            _ => None,
        });
        assert!(matches!(
            missing_secret,
            Err(ConfigError::MissingCredentials(API_SECRET_VAR))
        ));

        let blank_key = Credentials::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(
            blank_key,
            Err(ConfigError::MissingCredentials(API_KEY_VAR))
        ));
    }
}
