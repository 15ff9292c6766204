//! Common error types for musym

use thiserror::Error;

/// Common result type for musym operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across musym tools
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
