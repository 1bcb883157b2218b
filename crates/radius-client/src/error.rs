//! Client error types

use radius_dict::{DictionaryError, ImportError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::connection::ConnectionError;

/// Errors raised while assembling or running a client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resolution or connection failure
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Dictionary file could not be read or parsed
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Dictionary definitions were rejected
    #[error("Dictionary import error: {0}")]
    Import(#[from] ImportError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
