//! # Uplink Command Decoder
//!
//! Persistent state machine decoding the 17-byte command frame from the
//! onboard computer.
//!
//! Fields are acted on as soon as each one completes, not atomically at
//! frame end: a low-latency tradeoff, so partial frames never roll back.
//! Garbage before the preamble is discarded silently; the next `0xEA`
//! resynchronizes the stream.

use super::COMMAND_PREAMBLE;
use crate::actuation::{
    ActuationRouter, ActuatorBank, Joint, WheelSide, CHUTE_ENABLE_BIT, CHUTE_SELECT_MASK,
    LID_OPEN_BIT,
};
use crate::error::Result;
use crate::serial::ByteChannel;

/// Decoder cursor: each state consumes exactly one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FieldState {
    #[default]
    Preamble,
    LeftLo,
    LeftHi,
    LeftDir,
    RightLo,
    RightHi,
    RightDir,
    TurretLo,
    TurretHi,
    ShoulderLo,
    ShoulderHi,
    ElbowLo,
    ElbowHi,
    ForearmLo,
    ForearmHi,
    Hand,
    Chutes,
}

/// Last values written to the actuators
///
/// Mutated only by successful field decodes; holds the stored direction
/// byte a wheel-speed field is routed with before its own direction byte
/// arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandPayload {
    pub left_speed: u16,
    pub left_direction: u8,
    pub right_speed: u16,
    pub right_direction: u8,
    pub turret: u16,
    pub shoulder: u16,
    pub elbow: u16,
    pub forearm: u16,
    pub hand: u8,
    pub chutes: u8,
}

/// Uplink command frame decoder
///
/// Alive for the process lifetime; the cursor and accumulators survive
/// across drain calls because the uplink delivers bytes in arbitrary
/// chunks.
#[derive(Debug, Default)]
pub struct CommandDecoder {
    state: FieldState,
    payload: CommandPayload,
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last decoded payload values
    pub fn payload(&self) -> &CommandPayload {
        &self.payload
    }

    /// Drain all currently available uplink bytes, routing each completed
    /// field to the actuation router.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the channel reports more unconsumed bytes (the
    ///   caller re-arms the command event)
    /// * `Ok(false)` if the link was fully drained
    ///
    /// # Errors
    ///
    /// Returns `RoverCoreError::Transport` if the channel reports a read
    /// fault; decoding stops for this invocation and the cursor is
    /// preserved, so resynchronization continues on the next call.
    pub fn drain<C, B>(&mut self, channel: &mut C, router: &mut ActuationRouter<B>) -> Result<bool>
    where
        C: ByteChannel + ?Sized,
        B: ActuatorBank,
    {
        while channel.has_bytes() {
            let byte = channel.read_byte()?;
            self.feed(byte, router);
        }
        Ok(channel.has_bytes())
    }

    /// Advance the state machine by one byte
    fn feed<B: ActuatorBank>(&mut self, byte: u8, router: &mut ActuationRouter<B>) {
        let wide = byte as u16;

        self.state = match self.state {
            FieldState::Preamble => {
                if byte == COMMAND_PREAMBLE {
                    FieldState::LeftLo
                } else {
                    FieldState::Preamble
                }
            }

            FieldState::LeftLo => {
                self.payload.left_speed = wide;
                FieldState::LeftHi
            }
            FieldState::LeftHi => {
                self.payload.left_speed |= wide << 8;
                router.set_wheel(
                    WheelSide::Left,
                    self.payload.left_speed,
                    self.payload.left_direction,
                );
                FieldState::LeftDir
            }
            FieldState::LeftDir => {
                self.payload.left_direction = byte;
                router.set_wheel(WheelSide::Left, self.payload.left_speed, byte);
                FieldState::RightLo
            }

            FieldState::RightLo => {
                self.payload.right_speed = wide;
                FieldState::RightHi
            }
            FieldState::RightHi => {
                self.payload.right_speed |= wide << 8;
                router.set_wheel(
                    WheelSide::Right,
                    self.payload.right_speed,
                    self.payload.right_direction,
                );
                FieldState::RightDir
            }
            FieldState::RightDir => {
                self.payload.right_direction = byte;
                router.set_wheel(WheelSide::Right, self.payload.right_speed, byte);
                FieldState::TurretLo
            }

            FieldState::TurretLo => {
                self.payload.turret = wide;
                FieldState::TurretHi
            }
            FieldState::TurretHi => {
                self.payload.turret |= wide << 8;
                router.set_joint_destination(Joint::Turret, self.payload.turret);
                FieldState::ShoulderLo
            }
            FieldState::ShoulderLo => {
                self.payload.shoulder = wide;
                FieldState::ShoulderHi
            }
            FieldState::ShoulderHi => {
                self.payload.shoulder |= wide << 8;
                router.set_joint_destination(Joint::Shoulder, self.payload.shoulder);
                FieldState::ElbowLo
            }
            FieldState::ElbowLo => {
                self.payload.elbow = wide;
                FieldState::ElbowHi
            }
            FieldState::ElbowHi => {
                self.payload.elbow |= wide << 8;
                router.set_joint_destination(Joint::Elbow, self.payload.elbow);
                FieldState::ForearmLo
            }
            FieldState::ForearmLo => {
                self.payload.forearm = wide;
                FieldState::ForearmHi
            }
            FieldState::ForearmHi => {
                self.payload.forearm |= wide << 8;
                router.set_joint_destination(Joint::Forearm, self.payload.forearm);
                FieldState::Hand
            }

            FieldState::Hand => {
                self.payload.hand = byte;
                router.set_hand(byte);
                FieldState::Chutes
            }

            FieldState::Chutes => {
                // byte: lid | chute_en | c6 | c5 | c4 | c3 | c2 | c1
                self.payload.chutes = byte;
                router.set_chutes(byte & CHUTE_SELECT_MASK, byte & CHUTE_ENABLE_BIT != 0);
                router.set_lid(byte & LID_OPEN_BIT != 0);
                FieldState::Preamble
            }
        };
    }
}
