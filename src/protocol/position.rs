//! # Joint Position Decoders
//!
//! Two-state machines assembling little-endian position feedback, one
//! instance per joint channel.
//!
//! The joints do not share one validation policy. Turret and forearm gate
//! the commit on the assembled value; shoulder and elbow gate the high-byte
//! merge on the accumulator and commit unconditionally. The fielded
//! controllers behave this way per channel, so the policies are explicit
//! named variants rather than one unified check.

use super::JOINT_POSITION_MAX;
use crate::serial::ByteChannel;
use tracing::debug;

/// Per-channel validation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Commit the assembled value only if it is within `max`
    /// (turret, forearm)
    CommitInRange { max: u16 },

    /// OR-merge the high byte only if the accumulator is within `max` at
    /// that intermediate point, then commit whatever the accumulator holds
    /// (shoulder, elbow)
    MergeInRange { max: u16 },
}

impl ValidationPolicy {
    /// Policy for the turret and forearm channels
    pub fn commit_in_range() -> Self {
        ValidationPolicy::CommitInRange {
            max: JOINT_POSITION_MAX,
        }
    }

    /// Policy for the shoulder and elbow channels
    pub fn merge_in_range() -> Self {
        ValidationPolicy::MergeInRange {
            max: JOINT_POSITION_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ByteCursor {
    #[default]
    Low,
    High,
}

/// Position feedback decoder for one joint channel
///
/// The frame is a bare little-endian pair with no preamble.
#[derive(Debug)]
pub struct PositionDecoder {
    cursor: ByteCursor,
    accum: u16,
    policy: ValidationPolicy,
}

impl PositionDecoder {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            cursor: ByteCursor::Low,
            accum: 0,
            policy,
        }
    }

    /// Drain all currently available feedback bytes, committing validated
    /// positions to `published`.
    ///
    /// A transport fault ends the pass silently with the cursor preserved.
    ///
    /// # Returns
    ///
    /// Whether the channel still reports unconsumed bytes.
    pub fn drain<C>(&mut self, channel: &mut C, published: &mut u16) -> bool
    where
        C: ByteChannel + ?Sized,
    {
        while channel.has_bytes() {
            let byte = match channel.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    debug!("position link read fault: {}", e);
                    return channel.has_bytes();
                }
            };
            self.feed(byte, published);
        }
        channel.has_bytes()
    }

    fn feed(&mut self, byte: u8, published: &mut u16) {
        self.cursor = match self.cursor {
            ByteCursor::Low => {
                self.accum = byte as u16;
                ByteCursor::High
            }
            ByteCursor::High => {
                match self.policy {
                    ValidationPolicy::CommitInRange { max } => {
                        self.accum |= (byte as u16) << 8;
                        if self.accum <= max {
                            *published = self.accum;
                        }
                    }
                    ValidationPolicy::MergeInRange { max } => {
                        if self.accum <= max {
                            self.accum |= (byte as u16) << 8;
                        }
                        *published = self.accum;
                    }
                }
                ByteCursor::Low
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::channel::mocks::ScriptedChannel;

    fn feed(decoder: &mut PositionDecoder, published: &mut u16, bytes: &[u8]) {
        let mut channel = ScriptedChannel::new();
        channel.push_bytes(bytes);
        let more = decoder.drain(&mut channel, published);
        assert!(!more);
    }

    #[test]
    fn test_commit_in_range_accepts_4095() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::commit_in_range());
        let mut published = 0u16;

        feed(&mut decoder, &mut published, &4095u16.to_le_bytes());
        assert_eq!(published, 4095);
    }

    #[test]
    fn test_commit_in_range_rejects_4096() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::commit_in_range());
        let mut published = 1234u16;

        feed(&mut decoder, &mut published, &4096u16.to_le_bytes());
        assert_eq!(published, 1234, "4096 must not update the published position");
    }

    #[test]
    fn test_merge_in_range_commits_out_of_range_values() {
        // The merge gate checks the accumulator while it still holds only
        // the low byte, so it always passes and 4096 is committed
        let mut decoder = PositionDecoder::new(ValidationPolicy::merge_in_range());
        let mut published = 0u16;

        feed(&mut decoder, &mut published, &4096u16.to_le_bytes());
        assert_eq!(published, 4096);
    }

    #[test]
    fn test_merge_in_range_commits_in_range_values() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::merge_in_range());
        let mut published = 0u16;

        feed(&mut decoder, &mut published, &2048u16.to_le_bytes());
        assert_eq!(published, 2048);
    }

    #[test]
    fn test_pair_split_across_drains() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::commit_in_range());
        let mut published = 0u16;
        let bytes = 3000u16.to_le_bytes();

        feed(&mut decoder, &mut published, &bytes[..1]);
        assert_eq!(published, 0);

        feed(&mut decoder, &mut published, &bytes[1..]);
        assert_eq!(published, 3000);
    }

    #[test]
    fn test_several_pairs_in_one_drain_keep_the_last_valid() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::commit_in_range());
        let mut published = 0u16;

        let mut stream = Vec::new();
        stream.extend_from_slice(&100u16.to_le_bytes());
        stream.extend_from_slice(&5000u16.to_le_bytes()); // discarded
        stream.extend_from_slice(&200u16.to_le_bytes());

        feed(&mut decoder, &mut published, &stream);
        assert_eq!(published, 200);
    }

    #[test]
    fn test_transport_fault_preserves_partial_pair() {
        let mut decoder = PositionDecoder::new(ValidationPolicy::commit_in_range());
        let mut published = 0u16;
        let mut channel = ScriptedChannel::new();

        let bytes = 1500u16.to_le_bytes();
        channel.push_bytes(&bytes[..1]);
        channel.push_fault();
        channel.push_bytes(&bytes[1..]);

        assert!(decoder.drain(&mut channel, &mut published));
        assert!(!decoder.drain(&mut channel, &mut published));
        assert_eq!(published, 1500);
    }
}
