use perpscan::datasource::PerpsPositionDecoder;
use perpscan::{
    AppError, Config, JupiterPriceResolver, MarketRegistry, PortfolioSummary, PositionAggregator,
    PositionNormalizer, RpcAccountSource,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let source = Arc::new(RpcAccountSource::new(
        config.rpc_url.clone(),
        config.perps_program_id,
        config.http_timeout,
        config.rpc_max_retry,
    )?);
    let prices = Arc::new(JupiterPriceResolver::new(
        config.quote_api_url.clone(),
        config.http_timeout,
    )?);
    let normalizer = PositionNormalizer::new(Arc::new(MarketRegistry::jupiter_perps()), prices);
    let aggregator =
        PositionAggregator::new(source, Arc::new(PerpsPositionDecoder::new()), normalizer);

    tracing::info!("Fetching positions for {}", config.wallet_address);
    let positions = aggregator.fetch_positions(&config.wallet_address).await;
    let summary = PortfolioSummary::from_positions(&positions);

    for p in &positions {
        println!(
            "{:<5} {:<5} size=${} base={} entry=${} mark=${} pnl=${} lev={}x",
            p.symbol,
            p.direction,
            p.size_usd.round_dp(2),
            p.base_amount.round_dp(6),
            p.entry_price.round_dp(4),
            p.mark_price.round_dp(4),
            p.unrealized_pnl_usd.round_dp(2),
            p.leverage.round_dp(2),
        );
    }
    println!(
        "{} open positions, total size ${}, total PnL ${}",
        summary.position_count,
        summary.total_size_usd.round_dp(2),
        summary.total_pnl_usd.round_dp(2),
    );

    Ok(())
}
