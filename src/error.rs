//! Error types for tethering control operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TetherError {
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TetherError>;
