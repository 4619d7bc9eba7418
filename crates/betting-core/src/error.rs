use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BettingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}
