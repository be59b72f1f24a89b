//! # Telemetry Module
//!
//! Latest validated readings and the outbound telemetry frame.
//!
//! This module handles:
//! - Holding the most recent validated joint positions and science readings
//! - Assembling the fixed 13-byte feedback frame sent on each heartbeat
//!
//! Readings only change when a decoder commits a validated value, so a
//! channel that goes quiet keeps reporting its last good reading.

use crate::actuation::Joint;
use crate::protocol::{TELEMETRY_FRAME_LEN, TELEMETRY_START};

/// Most recent validated readings per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetryReadings {
    pub turret: u16,
    pub shoulder: u16,
    pub elbow: u16,
    pub forearm: u16,
    pub temperature: u16,
    pub humidity: u16,
}

impl TelemetryReadings {
    /// Mutable slot for one joint's published position
    pub fn position_mut(&mut self, joint: Joint) -> &mut u16 {
        match joint {
            Joint::Turret => &mut self.turret,
            Joint::Shoulder => &mut self.shoulder,
            Joint::Elbow => &mut self.elbow,
            Joint::Forearm => &mut self.forearm,
        }
    }

    /// Published position for one joint
    pub fn position(&self, joint: Joint) -> u16 {
        match joint {
            Joint::Turret => self.turret,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
            Joint::Forearm => self.forearm,
        }
    }

    /// Assemble the outbound telemetry frame
    ///
    /// Layout: start byte, then little-endian pairs for turret, shoulder,
    /// elbow, forearm, temperature, humidity.
    pub fn encode_frame(&self) -> [u8; TELEMETRY_FRAME_LEN] {
        let mut frame = [0u8; TELEMETRY_FRAME_LEN];
        frame[0] = TELEMETRY_START;
        frame[1..3].copy_from_slice(&self.turret.to_le_bytes());
        frame[3..5].copy_from_slice(&self.shoulder.to_le_bytes());
        frame[5..7].copy_from_slice(&self.elbow.to_le_bytes());
        frame[7..9].copy_from_slice(&self.forearm.to_le_bytes());
        frame[9..11].copy_from_slice(&self.temperature.to_le_bytes());
        frame[11..13].copy_from_slice(&self.humidity.to_le_bytes());
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout_is_bit_exact() {
        let readings = TelemetryReadings {
            turret: 0x0102,
            shoulder: 0x0304,
            elbow: 0x0506,
            forearm: 0x0708,
            temperature: 0x0900,
            humidity: 0x0A0B,
        };

        let frame = readings.encode_frame();
        assert_eq!(
            frame,
            [0xE3, 0x02, 0x01, 0x04, 0x03, 0x06, 0x05, 0x08, 0x07, 0x00, 0x09, 0x0B, 0x0A]
        );
    }

    #[test]
    fn test_default_readings_encode_as_zeroed_frame() {
        let frame = TelemetryReadings::default().encode_frame();
        assert_eq!(frame[0], TELEMETRY_START);
        assert!(frame[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_position_slots_match_joints() {
        let mut readings = TelemetryReadings::default();
        for (i, joint) in Joint::ALL.into_iter().enumerate() {
            *readings.position_mut(joint) = (i as u16 + 1) * 100;
        }
        assert_eq!(readings.turret, 100);
        assert_eq!(readings.shoulder, 200);
        assert_eq!(readings.elbow, 300);
        assert_eq!(readings.forearm, 400);
        assert_eq!(readings.position(Joint::Elbow), 300);
    }
}
