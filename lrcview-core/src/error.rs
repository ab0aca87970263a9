use thiserror::Error;

/// Errors raised outside the parser and tracker, which never fail.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
