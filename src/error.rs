use crate::config::ConfigError;
use crate::datasource::DataSourceError;
use thiserror::Error;

/// Failures that stop the binary before any position is fetched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Client setup error: {0}")]
    Client(#[from] DataSourceError),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
