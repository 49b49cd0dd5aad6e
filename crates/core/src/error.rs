use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostqError {
    #[error("invalid task cost {0}: must be finite and non-negative")]
    InvalidCost(f64),

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T, E = CostqError> = std::result::Result<T, E>;
