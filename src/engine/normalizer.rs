//! Raw position account -> normalized position.

use super::pnl::{self, PnlError};
use crate::datasource::PriceResolver;
use crate::domain::{Decimal, MarketRegistry, NormalizedPosition, RawPositionAccount};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Pnl(#[from] PnlError),
}

/// Maps decoded accounts onto the shared position model, pricing them with an
/// injected resolver.
#[derive(Debug, Clone)]
pub struct PositionNormalizer {
    markets: Arc<MarketRegistry>,
    prices: Arc<dyn PriceResolver>,
}

impl PositionNormalizer {
    pub fn new(markets: Arc<MarketRegistry>, prices: Arc<dyn PriceResolver>) -> Self {
        Self { markets, prices }
    }

    /// Normalize one account. Returns `None` for closed positions, unknown
    /// markets, and positions that failed to price; failures are logged.
    pub async fn normalize(&self, raw: &RawPositionAccount) -> Option<NormalizedPosition> {
        match self.try_normalize(raw).await {
            Ok(position) => position,
            Err(e) => {
                error!(
                    "Failed to normalize position (custody={}): {}",
                    raw.custody, e
                );
                None
            }
        }
    }

    async fn try_normalize(
        &self,
        raw: &RawPositionAccount,
    ) -> Result<Option<NormalizedPosition>, NormalizeError> {
        let Some(market) = self.markets.by_custody(&raw.custody) else {
            warn!("No market for custody {}; skipping position", raw.custody);
            return Ok(None);
        };

        let Some(direction) = raw.side.direction() else {
            return Ok(None);
        };
        if raw.size_usd.is_zero() {
            return Ok(None);
        }

        let size_usd = raw.size_usd.to_decimal();
        let collateral_usd = raw.collateral_usd.to_decimal();
        let entry_price = raw.price.to_decimal();

        let base_amount = size_usd.checked_div(entry_price).unwrap_or_else(Decimal::zero);

        debug!(
            "Pricing {} {} position opened at {:?}",
            market.symbol,
            direction,
            raw.opened_at()
        );
        let price = self.prices.resolve(market.symbol.as_str()).await;
        let (unrealized_pnl_usd, mark_price) = match price.usable_price() {
            Some(mark) => {
                let delta = pnl::calculate(raw.size_usd, raw.price, direction, mark)?;
                (delta.signed(), mark.to_decimal())
            }
            None => {
                debug!(
                    "No price for {}; reporting realized PnL {}",
                    market.symbol,
                    raw.realised_pnl_usd.to_decimal()
                );
                (raw.realised_pnl_usd.to_decimal(), entry_price)
            }
        };

        let leverage = if collateral_usd.is_positive() {
            size_usd.checked_div(collateral_usd).unwrap_or_else(Decimal::one)
        } else {
            Decimal::one()
        };

        Ok(Some(NormalizedPosition {
            symbol: market.symbol.clone(),
            size_usd,
            base_amount,
            direction,
            unrealized_pnl_usd,
            entry_price,
            mark_price,
            leverage,
            market_id: Some(market.market_index),
        }))
    }
}
