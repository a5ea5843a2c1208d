//! Varuna Core — error types and engine configuration.

pub mod config;
pub mod error;

pub use config::{EngineConfig, ScoringConfig, ServerConfig, TraversalConfig};
pub use error::{Error, Result};
