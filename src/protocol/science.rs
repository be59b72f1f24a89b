//! # Science Telemetry Decoder
//!
//! Decodes temperature and humidity frames from the science sensor MCU.
//!
//! Frame: `0xFF 0x9E`, then little-endian temperature and humidity pairs.
//! A mismatch on the second preamble byte restarts the scan from the first
//! preamble state; the mismatching byte is consumed.

use super::{HUMIDITY_MAX, SCIENCE_PREAMBLE_0, SCIENCE_PREAMBLE_1, TEMPERATURE_MAX};
use crate::serial::ByteChannel;
use crate::telemetry::TelemetryReadings;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScienceState {
    #[default]
    Pre0,
    Pre1,
    TempLo,
    TempHi,
    HumLo,
    HumHi,
}

/// Science telemetry frame decoder
#[derive(Debug, Default)]
pub struct ScienceDecoder {
    state: ScienceState,
    accum: u16,
}

impl ScienceDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all currently available science bytes, committing validated
    /// readings.
    ///
    /// A transport fault ends the pass silently; the cursor is preserved
    /// and the normal next dispatch pass picks the link back up.
    ///
    /// # Returns
    ///
    /// Whether the channel still reports unconsumed bytes.
    pub fn drain<C>(&mut self, channel: &mut C, readings: &mut TelemetryReadings) -> bool
    where
        C: ByteChannel + ?Sized,
    {
        while channel.has_bytes() {
            let byte = match channel.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    debug!("science link read fault: {}", e);
                    return channel.has_bytes();
                }
            };
            self.feed(byte, readings);
        }
        channel.has_bytes()
    }

    fn feed(&mut self, byte: u8, readings: &mut TelemetryReadings) {
        self.state = match self.state {
            ScienceState::Pre0 => {
                if byte == SCIENCE_PREAMBLE_0 {
                    ScienceState::Pre1
                } else {
                    ScienceState::Pre0
                }
            }
            ScienceState::Pre1 => {
                if byte == SCIENCE_PREAMBLE_1 {
                    ScienceState::TempLo
                } else {
                    ScienceState::Pre0
                }
            }
            ScienceState::TempLo => {
                self.accum = byte as u16;
                ScienceState::TempHi
            }
            ScienceState::TempHi => {
                self.accum |= (byte as u16) << 8;
                if self.accum <= TEMPERATURE_MAX {
                    readings.temperature = self.accum;
                    debug!("temperature {}", self.accum);
                }
                ScienceState::HumLo
            }
            ScienceState::HumLo => {
                self.accum = byte as u16;
                ScienceState::HumHi
            }
            ScienceState::HumHi => {
                self.accum |= (byte as u16) << 8;
                // The bound check reads the previously committed value,
                // not the incoming one
                if readings.humidity <= HUMIDITY_MAX {
                    readings.humidity = self.accum;
                    debug!("humidity {}", self.accum);
                }
                ScienceState::Pre0
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::channel::mocks::ScriptedChannel;

    fn science_frame(temperature: u16, humidity: u16) -> Vec<u8> {
        let mut frame = vec![SCIENCE_PREAMBLE_0, SCIENCE_PREAMBLE_1];
        frame.extend_from_slice(&temperature.to_le_bytes());
        frame.extend_from_slice(&humidity.to_le_bytes());
        frame
    }

    fn feed_stream(decoder: &mut ScienceDecoder, readings: &mut TelemetryReadings, bytes: &[u8]) {
        let mut channel = ScriptedChannel::new();
        channel.push_bytes(bytes);
        let more = decoder.drain(&mut channel, readings);
        assert!(!more);
    }

    #[test]
    fn test_valid_frame_commits_both_readings() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();

        feed_stream(&mut decoder, &mut readings, &science_frame(42, 600));
        assert_eq!(readings.temperature, 42);
        assert_eq!(readings.humidity, 600);
    }

    #[test]
    fn test_temperature_101_is_discarded_100_committed() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();

        feed_stream(&mut decoder, &mut readings, &science_frame(101, 0));
        assert_eq!(readings.temperature, 0, "101 must not be committed");

        feed_stream(&mut decoder, &mut readings, &science_frame(100, 0));
        assert_eq!(readings.temperature, 100);
    }

    #[test]
    fn test_out_of_range_temperature_keeps_previous_reading() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();

        feed_stream(&mut decoder, &mut readings, &science_frame(55, 10));
        feed_stream(&mut decoder, &mut readings, &science_frame(9999, 20));

        // Stale-but-valid wins over fresh-but-invalid
        assert_eq!(readings.temperature, 55);
        assert_eq!(readings.humidity, 20);
    }

    #[test]
    fn test_humidity_gate_checks_previous_value() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();

        // Previous value (0) passes the gate, so an out-of-range incoming
        // value is committed
        feed_stream(&mut decoder, &mut readings, &science_frame(0, 5000));
        assert_eq!(readings.humidity, 5000);

        // Now the committed value fails the gate and blocks further updates
        feed_stream(&mut decoder, &mut readings, &science_frame(0, 100));
        assert_eq!(readings.humidity, 5000);
    }

    #[test]
    fn test_corrupted_second_preamble_restarts_the_scan() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();

        // 0xFF 0x00: second byte mismatches; the 0x00 is consumed and the
        // scan restarts from the first-preamble state
        feed_stream(&mut decoder, &mut readings, &[0xFF, 0x00, 7, 0, 8, 0]);
        assert_eq!(readings.temperature, 0);
        assert_eq!(readings.humidity, 0);

        // A clean frame afterwards decodes normally
        feed_stream(&mut decoder, &mut readings, &science_frame(7, 8));
        assert_eq!(readings.temperature, 7);
        assert_eq!(readings.humidity, 8);
    }

    #[test]
    fn test_frame_split_across_drains() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();
        let frame = science_frame(33, 44);

        feed_stream(&mut decoder, &mut readings, &frame[..3]);
        assert_eq!(readings.temperature, 0);

        feed_stream(&mut decoder, &mut readings, &frame[3..]);
        assert_eq!(readings.temperature, 33);
        assert_eq!(readings.humidity, 44);
    }

    #[test]
    fn test_transport_fault_is_swallowed_and_reported_as_pending() {
        let mut decoder = ScienceDecoder::new();
        let mut readings = TelemetryReadings::default();
        let mut channel = ScriptedChannel::new();

        let frame = science_frame(21, 22);
        channel.push_bytes(&frame[..4]);
        channel.push_fault();
        channel.push_bytes(&frame[4..]);

        // The fault ends the pass; remaining bytes are reported pending
        assert!(decoder.drain(&mut channel, &mut readings));

        // Next pass finishes the frame
        assert!(!decoder.drain(&mut channel, &mut readings));
        assert_eq!(readings.temperature, 21);
        assert_eq!(readings.humidity, 22);
    }
}
