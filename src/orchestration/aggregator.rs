use crate::datasource::{AccountDecoder, AccountKind, AccountSource, DataSourceError};
use crate::domain::{NormalizedPosition, ParsePubkeyError, Pubkey, RawPositionAccount};
use crate::engine::PositionNormalizer;
use futures::future::join_all;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Fetches, decodes and normalizes every open position of a wallet.
#[derive(Debug, Clone)]
pub struct PositionAggregator {
    source: Arc<dyn AccountSource>,
    decoder: Arc<dyn AccountDecoder>,
    normalizer: PositionNormalizer,
}

impl PositionAggregator {
    pub fn new(
        source: Arc<dyn AccountSource>,
        decoder: Arc<dyn AccountDecoder>,
        normalizer: PositionNormalizer,
    ) -> Self {
        Self {
            source,
            decoder,
            normalizer,
        }
    }

    /// All positions that could be computed for `wallet`.
    ///
    /// Never fails: a fetch error is logged and yields an empty list, and
    /// accounts that fail to decode or normalize are left out. Order is not
    /// tied to the order accounts were fetched in.
    pub async fn fetch_positions(&self, wallet: &str) -> Vec<NormalizedPosition> {
        match self.try_fetch_positions(wallet).await {
            Ok(positions) => positions,
            Err(e) => {
                error!("Failed to fetch positions for {}: {}", wallet, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_positions(
        &self,
        wallet: &str,
    ) -> Result<Vec<NormalizedPosition>, AggregateError> {
        let wallet = Pubkey::from_str(wallet)?;
        let accounts = self.source.fetch_raw_accounts(&wallet).await?;
        info!("Found {} position accounts for {}", accounts.len(), wallet);

        let open: Vec<RawPositionAccount> = accounts
            .iter()
            .filter_map(|account| match self.decoder.decode(AccountKind::Position, &account.data) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("Skipping account {}: {}", account.pubkey, e);
                    None
                }
            })
            .filter(RawPositionAccount::is_open)
            .collect();

        let normalized = join_all(open.iter().map(|raw| self.normalizer.normalize(raw))).await;
        let positions: Vec<NormalizedPosition> = normalized.into_iter().flatten().collect();

        info!(
            "Normalized {} of {} open positions",
            positions.len(),
            open.len()
        );
        Ok(positions)
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("invalid wallet address: {0}")]
    InvalidWallet(#[from] ParsePubkeyError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{MockAccountSource, PerpsPositionDecoder, StaticPriceResolver};
    use crate::domain::MarketRegistry;

    fn aggregator(source: MockAccountSource) -> PositionAggregator {
        let normalizer = PositionNormalizer::new(
            Arc::new(MarketRegistry::jupiter_perps()),
            Arc::new(StaticPriceResolver::new()),
        );
        PositionAggregator::new(Arc::new(source), Arc::new(PerpsPositionDecoder::new()), normalizer)
    }

    #[tokio::test]
    async fn test_invalid_wallet_yields_empty() {
        let positions = aggregator(MockAccountSource::new())
            .fetch_positions("not a wallet")
            .await;
        assert!(positions.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_wallet_is_a_parse_error() {
        let agg = aggregator(MockAccountSource::new());
        for wallet in ["0xdeadbeef", "1111", ""] {
            let err = agg.try_fetch_positions(wallet).await.unwrap_err();
            assert!(matches!(err, AggregateError::InvalidWallet(_)), "{wallet}");
        }
    }

    #[tokio::test]
    async fn test_source_failure_yields_empty() {
        let source = MockAccountSource::failing(DataSourceError::NetworkError("down".to_string()));
        let positions = aggregator(source)
            .fetch_positions(&Pubkey::new_from_array([1u8; 32]).to_string())
            .await;
        assert!(positions.is_empty());
    }
}
