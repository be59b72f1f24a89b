//! # Serial Communication Module
//!
//! Byte channel implementation over physical serial links.
//!
//! This module handles:
//! - Opening serial ports with 8N1 framing and no flow control
//! - The polled `ByteChannel` contract over `tokio_serial::SerialStream`
//! - Mapping serial faults to transport errors
//!
//! Six links are opened in production: the bidirectional uplink, the
//! science link and four joint feedback links.

pub mod channel;

pub use channel::ByteChannel;

use crate::error::{Result, RoverCoreError};
use std::io::{Read, Write};
use tokio_serial::{SerialPort, SerialPortBuilderExt};
use tracing::debug;

/// Serial-backed byte channel
///
/// Wraps one opened serial port and exposes the polled read/write contract
/// the protocol state machines consume.
pub struct SerialChannel {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl std::fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl SerialChannel {
    /// Open a serial port as a byte channel
    ///
    /// # Arguments
    ///
    /// * `path` - Device path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Line speed in baud
    ///
    /// # Errors
    ///
    /// Returns `RoverCoreError::Serial` if the port cannot be opened
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        debug!("opening serial port {} at {} baud", path, baud_rate);

        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| RoverCoreError::Serial(format!("failed to open {}: {}", path, e)))?;

        Ok(Self {
            port,
            device_path: path.to_string(),
        })
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl ByteChannel for SerialChannel {
    fn has_bytes(&self) -> bool {
        self.port.bytes_to_read().map(|n| n > 0).unwrap_or(false)
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) => Err(RoverCoreError::Transport(format!(
                "{}: read returned no data",
                self.device_path
            ))),
            Err(e) => Err(RoverCoreError::Transport(format!(
                "{}: read failed: {}",
                self.device_path, e
            ))),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes).map_err(|e| {
            RoverCoreError::Transport(format!("{}: write failed: {}", self.device_path, e))
        })?;
        self.port.flush().map_err(|e| {
            RoverCoreError::Transport(format!("{}: flush failed: {}", self.device_path, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_with_invalid_path_returns_error() {
        let result = SerialChannel::open("/dev/nonexistent_serial_device_12345", 9600);

        assert!(result.is_err());
        match result.unwrap_err() {
            RoverCoreError::Serial(msg) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("failed to open"));
            }
            other => panic!("expected Serial error, got: {:?}", other),
        }
    }
}
