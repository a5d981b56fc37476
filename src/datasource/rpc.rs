//! JSON-RPC account source using `getProgramAccounts`.

use super::decoder::POSITION_ACCOUNT_LEN;
use super::{AccountSource, DataSourceError, RawAccount};
use crate::domain::Pubkey;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Byte offset of the owner key, right after the discriminator.
const OWNER_OFFSET: usize = 8;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: AccountInfo,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    /// `[payload, encoding]`
    data: (String, String),
}

/// Fetches position accounts owned by a wallet from a Solana RPC node.
#[derive(Debug, Clone)]
pub struct RpcAccountSource {
    client: Client,
    rpc_url: String,
    program_id: Pubkey,
    max_retry: Duration,
}

impl RpcAccountSource {
    pub fn new(
        rpc_url: String,
        program_id: Pubkey,
        timeout: Duration,
        max_retry: Duration,
    ) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::Other(e.to_string()))?;
        Ok(Self {
            client,
            rpc_url,
            program_id,
            max_retry,
        })
    }

    fn request_body(&self, wallet: &Pubkey) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getProgramAccounts",
            "params": [
                self.program_id.to_string(),
                {
                    "encoding": "base64",
                    "commitment": "confirmed",
                    "filters": [
                        { "dataSize": POSITION_ACCOUNT_LEN },
                        { "memcmp": { "offset": OWNER_OFFSET, "bytes": wallet.to_string() } }
                    ]
                }
            ]
        })
    }

    async fn post_rpc(&self, payload: serde_json::Value) -> Result<Vec<KeyedAccount>, DataSourceError> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.max_retry),
            ..Default::default()
        };

        let response: RpcResponse<Vec<KeyedAccount>> = retry(backoff, || async {
            let response = self
                .client
                .post(&self.rpc_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<RpcResponse<Vec<KeyedAccount>>>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await?;

        if let Some(err) = response.error {
            return Err(DataSourceError::RpcError {
                code: err.code,
                message: err.message,
            });
        }

        response
            .result
            .ok_or_else(|| DataSourceError::ParseError("Missing result field".to_string()))
    }
}

#[async_trait]
impl AccountSource for RpcAccountSource {
    async fn fetch_raw_accounts(&self, wallet: &Pubkey) -> Result<Vec<RawAccount>, DataSourceError> {
        debug!(
            "Fetching position accounts for wallet={}, program={}",
            wallet, self.program_id
        );

        let keyed = self.post_rpc(self.request_body(wallet)).await?;

        let mut accounts = Vec::with_capacity(keyed.len());
        for item in keyed {
            match parse_keyed_account(&item) {
                Ok(account) => accounts.push(account),
                Err(e) => {
                    warn!("Failed to parse account {}: {}", item.pubkey, e);
                }
            }
        }

        debug!("Fetched {} position accounts", accounts.len());
        Ok(accounts)
    }
}

fn parse_keyed_account(item: &KeyedAccount) -> Result<RawAccount, DataSourceError> {
    let pubkey = Pubkey::from_str(&item.pubkey)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid pubkey: {}", e)))?;

    let (payload, encoding) = &item.account.data;
    if encoding != "base64" {
        return Err(DataSourceError::ParseError(format!(
            "Unexpected encoding: {}",
            encoding
        )));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid base64: {}", e)))?;

    Ok(RawAccount::new(pubkey, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RpcAccountSource {
        RpcAccountSource::new(
            "http://127.0.0.1:9".to_string(),
            Pubkey::new_from_array([5u8; 32]),
            Duration::from_millis(100),
            Duration::from_millis(300),
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_filters() {
        let wallet = Pubkey::new_from_array([7u8; 32]);
        let body = source().request_body(&wallet);
        assert_eq!(body["method"], "getProgramAccounts");
        assert_eq!(body["params"][0], Pubkey::new_from_array([5u8; 32]).to_string());

        let filters = &body["params"][1]["filters"];
        assert_eq!(filters[0]["dataSize"], POSITION_ACCOUNT_LEN);
        assert_eq!(filters[1]["memcmp"]["offset"], OWNER_OFFSET);
        assert_eq!(filters[1]["memcmp"]["bytes"], wallet.to_string());
    }

    #[test]
    fn test_parse_rpc_response() {
        let key = Pubkey::new_from_array([3u8; 32]);
        let json = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [{
                "pubkey": key.to_string(),
                "account": {
                    "data": ["AQID", "base64"],
                    "executable": false,
                    "lamports": 2039280,
                    "owner": "PERPHjGBqRHArX4DySjwM6UJHiR3sWAatqfdBS2qQJu",
                    "rentEpoch": 0
                }
            }]
        });
        let response: RpcResponse<Vec<KeyedAccount>> = serde_json::from_value(json).unwrap();
        let items = response.result.unwrap();
        let account = parse_keyed_account(&items[0]).unwrap();
        assert_eq!(account.pubkey, key);
        assert_eq!(account.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_rpc_error_object() {
        let json = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param" }
        });
        let response: RpcResponse<Vec<KeyedAccount>> = serde_json::from_value(json).unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_parse_keyed_account_rejects_bad_base64() {
        let item = KeyedAccount {
            pubkey: Pubkey::new_from_array([3u8; 32]).to_string(),
            account: AccountInfo {
                data: ("!!!".to_string(), "base64".to_string()),
            },
        };
        assert!(matches!(
            parse_keyed_account(&item),
            Err(DataSourceError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_keyed_account_rejects_other_encoding() {
        let item = KeyedAccount {
            pubkey: Pubkey::new_from_array([3u8; 32]).to_string(),
            account: AccountInfo {
                data: ("AQID".to_string(), "base58".to_string()),
            },
        };
        assert!(parse_keyed_account(&item).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_an_error() {
        let result = source().fetch_raw_accounts(&Pubkey::new_from_array([7u8; 32])).await;
        assert!(matches!(result, Err(DataSourceError::NetworkError(_))));
    }
}
