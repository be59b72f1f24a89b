//! # Error Types
//!
//! Custom error types for the rover payload core using `thiserror`.
//!
//! There is no fatal error path in this core: transport faults abort a
//! single decode pass and the self-resynchronizing protocols recover on
//! the next dispatch pass.

use thiserror::Error;

/// Main error type for the rover payload core
#[derive(Debug, Error)]
pub enum RoverCoreError {
    /// A byte channel reported a read or framing fault
    #[error("transport error: {0}")]
    Transport(String),

    /// Serial port errors (open, write, flush)
    #[error("serial error: {0}")]
    Serial(String),

    /// No serial device could be opened
    #[error("serial port not found: {0}")]
    SerialPortNotFound(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the rover payload core
pub type Result<T> = std::result::Result<T, RoverCoreError>;
