//! # Protocol Module
//!
//! Byte-oriented protocol state machines for the payload links.
//!
//! This module handles:
//! - Uplink command frame decoding (17-byte frame, incremental actuation)
//! - Science telemetry decoding (temperature, humidity)
//! - Joint position feedback decoding (one two-state machine per joint)
//! - Frame resynchronization via preamble scanning
//!
//! Each decoder is a persistent cursor plus partial accumulator that
//! survives across invocations: a drain call can see an empty link, a
//! field split mid-way, or several frames back to back.

pub mod command;
pub mod position;
pub mod science;

/// Uplink command frame preamble
pub const COMMAND_PREAMBLE: u8 = 0xEA;

/// Uplink command frame length including the preamble
pub const COMMAND_FRAME_LEN: usize = 17;

/// Outbound telemetry frame start byte
pub const TELEMETRY_START: u8 = 0xE3;

/// Outbound telemetry frame length
/// (start byte, then little-endian pairs for four positions, temperature,
/// humidity)
pub const TELEMETRY_FRAME_LEN: usize = 13;

/// Science telemetry frame preamble, first byte
pub const SCIENCE_PREAMBLE_0: u8 = 0xFF;

/// Science telemetry frame preamble, second byte
pub const SCIENCE_PREAMBLE_1: u8 = 0x9E;

/// Request frame soliciting one science telemetry frame
pub const SCIENCE_DATA_REQUEST: [u8; 2] = [0xAE, 0x01];

/// Feedback-request command sent to each joint channel on heartbeat
pub const JOINT_FEEDBACK_REQUEST: [u8; 1] = [0xA5];

/// Highest committable temperature reading
pub const TEMPERATURE_MAX: u16 = 100;

/// Humidity bound; checked against the previously committed value
pub const HUMIDITY_MAX: u16 = 1023;

/// Highest committable joint position (12-bit encoder)
pub const JOINT_POSITION_MAX: u16 = 4095;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(COMMAND_PREAMBLE, 0xEA);
        assert_eq!(COMMAND_FRAME_LEN, 17);
        assert_eq!(TELEMETRY_START, 0xE3);
        assert_eq!(TELEMETRY_FRAME_LEN, 13);
        assert_eq!(SCIENCE_PREAMBLE_0, 0xFF);
        assert_eq!(SCIENCE_PREAMBLE_1, 0x9E);
        assert_eq!(SCIENCE_DATA_REQUEST, [0xAE, 0x01]);
    }

    #[test]
    fn test_validation_bounds() {
        assert_eq!(TEMPERATURE_MAX, 100);
        assert_eq!(HUMIDITY_MAX, 1023);
        assert_eq!(JOINT_POSITION_MAX, 4095);
    }
}
