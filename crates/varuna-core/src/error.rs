//! Error types for the Varuna knowledge engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
