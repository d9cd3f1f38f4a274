use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),
}

pub type Result<T> = std::result::Result<T, Error>;
