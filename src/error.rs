//! Error types for the outer conversion surfaces
//!
//! The token-to-node transform never fails: unsupported or malformed input is
//! dropped. Errors only come from the surfaces around it (looking up a lexer,
//! reading a serialized token stream, loading configuration).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("no lexer registered under '{0}'")]
    LexerNotFound(String),

    #[error("invalid token stream: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
