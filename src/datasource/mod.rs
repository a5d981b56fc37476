//! External collaborators: account fetching, account decoding, and price quotes.

use crate::domain::Pubkey;
use async_trait::async_trait;
use std::fmt;

pub mod decoder;
pub mod jupiter;
pub mod mock;
pub mod price;
pub mod rpc;

pub use decoder::{AccountDecoder, AccountKind, DecodeError, PerpsPositionDecoder};
pub use jupiter::{JupiterPriceResolver, TokenInfo};
pub use mock::{MockAccountSource, StaticPriceResolver};
pub use price::{PriceResolver, PriceResult};
pub use rpc::RpcAccountSource;

/// An undecoded program account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
}

impl RawAccount {
    pub fn new(pubkey: Pubkey, data: Vec<u8>) -> Self {
        Self { pubkey, data }
    }
}

/// Source of raw position accounts owned by a wallet.
///
/// Implementations handle transport, retry and base64 decoding.
#[async_trait]
pub trait AccountSource: Send + Sync + fmt::Debug {
    /// Fetch every position account whose owner is `wallet`.
    async fn fetch_raw_accounts(&self, wallet: &Pubkey) -> Result<Vec<RawAccount>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// JSON-RPC error object returned by the node
    RpcError { code: i64, message: String },
    /// Rate limit exceeded
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RpcError { code, message } => {
                write!(f, "RPC error {}: {}", code, message)
            }
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
