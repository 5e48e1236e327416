//! Error types for the MCP server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MCP server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while starting or running the server.
///
/// Failures inside a tool call never surface here; they are folded into a
/// tool error result instead (see [`crate::envelope`]).
#[derive(Debug, Error)]
pub enum Error {
    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the stdio or TCP transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::FileConfig`]
    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A resolved config value failed validation
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Tool registration failed at startup
    #[error("tool registration failed: {0}")]
    Registry(String),
}
