use std::io;
use thiserror::Error;

/// Custom error type for the SysPulse backend
#[derive(Error, Debug)]
pub enum SysPulseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the SysPulse backend
pub type Result<T> = std::result::Result<T, SysPulseError>;

impl SysPulseError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Config(msg.into())
    }

    /// Create a server error
    pub fn server<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Server(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        SysPulseError::MetricCollection(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Other(msg.into())
    }
}
