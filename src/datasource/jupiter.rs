//! Price resolution through the Jupiter swap quote API.
//!
//! The price of one unit of an asset is the amount of the stable reference a
//! swap of exactly one unit would return.

use super::price::{PriceResolver, PriceResult};
use super::DataSourceError;
use crate::domain::fixed::div_round_half_up;
use crate::domain::{FixedPoint, USD_DECIMALS};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Symbol priced at exactly 1.000000 without a request.
pub const STABLE_SYMBOL: &str = "USDC";

const SLIPPAGE_BPS: u16 = 50;

/// Mint and decimals of a quotable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub mint: String,
    pub decimals: u32,
}

impl TokenInfo {
    pub fn new(mint: impl Into<String>, decimals: u32) -> Self {
        Self {
            mint: mint.into(),
            decimals,
        }
    }
}

fn default_tokens() -> HashMap<String, TokenInfo> {
    HashMap::from([
        (
            "SOL".to_string(),
            TokenInfo::new("So11111111111111111111111111111111111111112", 9),
        ),
        (
            "ETH".to_string(),
            TokenInfo::new("7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs", 8),
        ),
        (
            "BTC".to_string(),
            TokenInfo::new("3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh", 8),
        ),
        (
            STABLE_SYMBOL.to_string(),
            TokenInfo::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", 6),
        ),
    ])
}

/// Fields of a quote response the resolver reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    in_amount: String,
    out_amount: String,
}

#[derive(Debug, Clone)]
pub struct JupiterPriceResolver {
    client: Client,
    base_url: String,
    tokens: HashMap<String, TokenInfo>,
}

impl JupiterPriceResolver {
    /// Create a resolver with the built-in token table.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: default_tokens(),
        })
    }

    async fn fetch_quote(
        &self,
        input: &TokenInfo,
        output: &TokenInfo,
    ) -> Result<QuoteResponse, DataSourceError> {
        let url = format!("{}/quote", self.base_url);
        let amount = 10u64
            .checked_pow(input.decimals)
            .ok_or_else(|| DataSourceError::Other("token decimals too large".to_string()))?;

        let response = self
            .client
            .get(&url)
            .query(&[
                ("inputMint", input.mint.clone()),
                ("outputMint", output.mint.clone()),
                ("amount", amount.to_string()),
                ("slippageBps", SLIPPAGE_BPS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DataSourceError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<QuoteResponse>()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl PriceResolver for JupiterPriceResolver {
    async fn resolve(&self, symbol: &str) -> PriceResult {
        if symbol == STABLE_SYMBOL {
            return PriceResult::ok(FixedPoint::ONE);
        }

        let (Some(input), Some(output)) = (self.tokens.get(symbol), self.tokens.get(STABLE_SYMBOL))
        else {
            debug!("No quote route for unsupported symbol {}", symbol);
            return PriceResult::failed();
        };

        let quote = match self.fetch_quote(input, output).await {
            Ok(q) => q,
            Err(e) => {
                debug!("Quote request for {} failed: {}", symbol, e);
                return PriceResult::failed();
            }
        };

        match price_from_quote(&quote.in_amount, &quote.out_amount, input.decimals, output.decimals) {
            Some(price) => {
                debug!("Resolved {} at {}", symbol, price);
                PriceResult::ok(price)
            }
            None => {
                debug!(
                    "Unusable quote for {}: inAmount={}, outAmount={}",
                    symbol, quote.in_amount, quote.out_amount
                );
                PriceResult::failed()
            }
        }
    }
}

/// Convert a quote into a 6-decimal USD price.
///
/// `price = outAmount * 10^inDecimals / inAmount`, rescaled from the output
/// token's decimals and rounded half-up. Zero or unparsable amounts yield `None`.
pub fn price_from_quote(
    in_amount: &str,
    out_amount: &str,
    input_decimals: u32,
    output_decimals: u32,
) -> Option<FixedPoint> {
    let in_amount: u128 = in_amount.trim().parse().ok()?;
    let out_amount: u128 = out_amount.trim().parse().ok()?;
    if in_amount == 0 || out_amount == 0 {
        return None;
    }

    let num = out_amount
        .checked_mul(10u128.checked_pow(input_decimals)?)?
        .checked_mul(10u128.checked_pow(USD_DECIMALS)?)?;
    let den = in_amount.checked_mul(10u128.checked_pow(output_decimals)?)?;

    let price = div_round_half_up(num, den)?;
    let price = u64::try_from(price).ok()?;
    (price > 0).then_some(FixedPoint::from_raw(price))
}
