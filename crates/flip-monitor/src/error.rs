use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Game already tracked or alerted: {0}")]
    DuplicateGame(String),

    #[error("Unknown game: {0}")]
    UnknownGame(String),
}
