use thiserror::Error;

/// Error type for benchmark comparison runs.
#[derive(Debug, Error)]
pub enum BenchDiffError {
    #[error("no data found: {0}")]
    NoData(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("io error: {0}")]
    IoError(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl BenchDiffError {
    pub fn no_data<T: Into<String>>(msg: T) -> Self {
        BenchDiffError::NoData(msg.into())
    }

    pub fn missing_column<T: Into<String>>(msg: T) -> Self {
        BenchDiffError::MissingColumn(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        BenchDiffError::ParseError(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        BenchDiffError::IoError(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BenchDiffError::InvalidInput(msg.into())
    }
}
