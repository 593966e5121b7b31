use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("throttle wait must be non-negative, got {0}ms")]
    NegativeWait(i64),

    #[error("Failed to encode metrics: {0}")]
    Metrics(String),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
