use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{config_error, Error};

const DEFAULT_API_BASE: &str = "https://maps.googleapis.com";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    /// Scheme and host of the Google Maps web services, without a trailing slash.
    pub api_base: String,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    /// Program handed the map URL; when unset the URL is only logged.
    pub launch_command: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.into(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            launch_command: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let api_key = env::var("GOOGLE_MAPS_API_KEY")?;
        let api_base = env::var("GOOGLE_MAPS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| config_error(format!("LISTEN_ADDR: {}", e)))?;

        let request_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| config_error(format!("HTTP_TIMEOUT_SECS: {}", e)))?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let launch_command = env::var("MAP_LAUNCH_COMMAND")
            .ok()
            .filter(|cmd| !cmd.trim().is_empty());

        Ok(Self {
            listen_addr,
            request_timeout,
            launch_command,
            ..Self::new(api_key).with_api_base(api_base)
        })
    }
}

#[test]
fn api_base_drops_trailing_slash() {
    let config = Config::new("key").with_api_base("http://127.0.0.1:8080/");

    assert_eq!(config.api_base, "http://127.0.0.1:8080");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert!(config.launch_command.is_none());
}
