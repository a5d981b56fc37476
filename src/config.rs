use crate::domain::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_QUOTE_API_URL: &str = "https://quote-api.jup.ag/v6";
pub const JUPITER_PERPS_PROGRAM_ID: &str = "PERPHjGBqRHArX4DySjwM6UJHiR3sWAatqfdBS2qQJu";

#[derive(Debug, Clone)]
pub struct Config {
    pub wallet_address: String,
    pub rpc_url: String,
    pub quote_api_url: String,
    pub perps_program_id: Pubkey,
    /// Applied to every outbound HTTP request.
    pub http_timeout: Duration,
    /// Upper bound on retrying the account fetch.
    pub rpc_max_retry: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let wallet_address = env_map
            .get("WALLET_ADDRESS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("WALLET_ADDRESS".to_string()))?;
        Pubkey::from_str(&wallet_address).map_err(|e| {
            ConfigError::InvalidValue("WALLET_ADDRESS".to_string(), e.to_string())
        })?;

        let rpc_url = env_map
            .get("RPC_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let quote_api_url = env_map
            .get("QUOTE_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_QUOTE_API_URL.to_string());

        let perps_program_id = Pubkey::from_str(
            env_map
                .get("PERPS_PROGRAM_ID")
                .map(|s| s.as_str())
                .unwrap_or(JUPITER_PERPS_PROGRAM_ID),
        )
        .map_err(|e| ConfigError::InvalidValue("PERPS_PROGRAM_ID".to_string(), e.to_string()))?;

        let http_timeout = parse_millis(&env_map, "HTTP_TIMEOUT_MS", 10_000)?;
        let rpc_max_retry = parse_millis(&env_map, "RPC_MAX_RETRY_MS", 30_000)?;

        Ok(Config {
            wallet_address,
            rpc_url,
            quote_api_url,
            perps_program_id,
            http_timeout,
            rpc_max_retry,
        })
    }
}

fn parse_millis(
    env_map: &HashMap<String, String>,
    key: &str,
    default_ms: u64,
) -> Result<Duration, ConfigError> {
    let ms = match env_map.get(key) {
        Some(v) => v.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid u64".to_string())
        })?,
        None => default_ms,
    };
    if ms == 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}
