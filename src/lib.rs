pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{
    AccountDecoder, AccountSource, DataSourceError, JupiterPriceResolver, MockAccountSource,
    PerpsPositionDecoder, PriceResolver, PriceResult, RawAccount, RpcAccountSource,
    StaticPriceResolver,
};
pub use domain::{
    Decimal, Direction, FixedPoint, MarketDescriptor, MarketRegistry, NormalizedPosition,
    PortfolioSummary, Pubkey, RawPositionAccount, RawSide, SignedFixedPoint, Symbol,
};
pub use engine::PositionNormalizer;
pub use error::AppError;
pub use orchestration::PositionAggregator;
