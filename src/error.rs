//! Error types for blockfund

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("{0}")]
    InvalidBlock(String),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Cryptographic error: {0}")]
    CryptoError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Course layout error: {0}")]
    CourseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ChainError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        ChainError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
