// SysPulse Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, SysPulseError};

// Module declarations
pub mod core;
pub mod server;

// Re-export commonly used types
pub use crate::core::monitor::{MetricsFrame, MonitorHandle, ProcessSample, SystemSnapshot};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
