//! In-memory collaborators for testing without network calls.

use super::price::{PriceResolver, PriceResult};
use super::{AccountSource, DataSourceError, RawAccount};
use crate::domain::{FixedPoint, Pubkey};
use async_trait::async_trait;
use std::collections::HashMap;

/// Account source that returns predefined accounts, or a forced error.
#[derive(Debug, Clone, Default)]
pub struct MockAccountSource {
    accounts: Vec<RawAccount>,
    error: Option<DataSourceError>,
}

impl MockAccountSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: RawAccount) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<RawAccount>) -> Self {
        self.accounts.extend(accounts);
        self
    }

    /// Make every fetch fail with `error`.
    pub fn failing(error: DataSourceError) -> Self {
        Self {
            accounts: Vec::new(),
            error: Some(error),
        }
    }
}

#[async_trait]
impl AccountSource for MockAccountSource {
    async fn fetch_raw_accounts(&self, _wallet: &Pubkey) -> Result<Vec<RawAccount>, DataSourceError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(self.accounts.clone()),
        }
    }
}

/// Price resolver backed by a fixed symbol -> price table.
///
/// Symbols missing from the table resolve as failures.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceResolver {
    prices: HashMap<String, FixedPoint>,
}

impl StaticPriceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: impl Into<String>, price: FixedPoint) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }
}

#[async_trait]
impl PriceResolver for StaticPriceResolver {
    async fn resolve(&self, symbol: &str) -> PriceResult {
        match self.prices.get(symbol) {
            Some(price) => PriceResult::ok(*price),
            None => PriceResult::failed(),
        }
    }
}
