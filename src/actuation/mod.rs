//! # Actuation Module
//!
//! Translates decoded command fields into discrete actuator-output
//! operations.
//!
//! This module handles:
//! - The `ActuatorBank` sink contract (wheels, joints, hand, chutes, lid)
//! - The `ActuationRouter`, invoked synchronously during command decode
//! - Left/right drivetrain direction mirroring
//! - Chute-enable gating and lid servo mapping
//!
//! The router is a stateless translator: destination state lives with the
//! command decoder, hardware drivers live behind the bank trait.

use tracing::{debug, info};

/// Drivetrain half
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSide {
    Left,
    Right,
}

/// Arm joints with position feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Turret,
    Shoulder,
    Elbow,
    Forearm,
}

impl Joint {
    /// All joints, in frame order (closest to the rover outward)
    pub const ALL: [Joint; 4] = [Joint::Turret, Joint::Shoulder, Joint::Elbow, Joint::Forearm];

    /// Stable index for per-joint storage
    pub fn index(self) -> usize {
        match self {
            Joint::Turret => 0,
            Joint::Shoulder => 1,
            Joint::Elbow => 2,
            Joint::Forearm => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Turret => "turret",
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
            Joint::Forearm => "forearm",
        }
    }
}

/// Tri-state hand command
///
/// Maps to two complementary digital drive lines plus an enable line;
/// `Hold` de-asserts the enable line so the actuator is unpowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandCommand {
    Open,
    Close,
    Hold,
}

impl HandCommand {
    /// Decode the hand command byte (1 = open, 2 = close, anything else holds)
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => HandCommand::Open,
            2 => HandCommand::Close,
            _ => HandCommand::Hold,
        }
    }

    /// The (a, b, enable) drive line levels for this command
    pub fn drive_lines(self) -> (bool, bool, bool) {
        match self {
            HandCommand::Open => (true, false, true),
            HandCommand::Close => (false, true, true),
            HandCommand::Hold => (false, false, false),
        }
    }
}

/// Lid servo pulse width for the open extreme, in microseconds
pub const LID_OPEN_PULSE_US: u16 = 1000;

/// Lid servo pulse width for the closed extreme, in microseconds
pub const LID_CLOSED_PULSE_US: u16 = 2000;

/// Low six bits of the chute control byte select chutes
pub const CHUTE_SELECT_MASK: u8 = 0x3F;

/// Bit 6 of the chute control byte gates chute actuation
pub const CHUTE_ENABLE_BIT: u8 = 0x40;

/// Bit 7 of the chute control byte selects lid open/closed
pub const LID_OPEN_BIT: u8 = 0x80;

/// Chute actuator pairs wired in the current harness.
///
/// The control byte can select six chutes but only four pairs exist; bits
/// 4-5 are accepted and ignored.
pub const WIRED_CHUTES: usize = 4;

/// Discrete actuator-output sink
///
/// Fire-and-forget: no operation acknowledges. Hardware drivers implement
/// this; the core only talks to the trait.
pub trait ActuatorBank: Send {
    /// Set one drivetrain half's speed and direction
    fn set_wheel(&mut self, side: WheelSide, speed: u16, forward: bool);

    /// Send a joint its new destination
    fn set_joint_destination(&mut self, joint: Joint, value: u16);

    /// Drive the hand actuator
    fn set_hand(&mut self, command: HandCommand);

    /// Drive the chute actuators; a set bit closes the chute, a clear bit
    /// returns it to the open rest state
    fn set_chutes(&mut self, mask: u8);

    /// Move the payload-box lid to one of the two servo extremes
    fn set_lid(&mut self, open: bool);

    /// Stop the wheels and release every actuator (command-link watchdog)
    fn release_all(&mut self);
}

/// Stateless translator from decoded command fields to bank operations
#[derive(Debug)]
pub struct ActuationRouter<B: ActuatorBank> {
    bank: B,
}

impl<B: ActuatorBank> ActuationRouter<B> {
    pub fn new(bank: B) -> Self {
        Self { bank }
    }

    /// Route a wheel field
    ///
    /// `direction` is the raw direction byte from the frame. The left
    /// drivetrain half is mechanically mirrored, so its commanded
    /// direction is the logical inverse of the byte's truthiness; the
    /// right half takes the byte verbatim.
    pub fn set_wheel(&mut self, side: WheelSide, speed: u16, direction: u8) {
        let forward = match side {
            WheelSide::Left => direction == 0,
            WheelSide::Right => direction != 0,
        };
        self.bank.set_wheel(side, speed, forward);
    }

    /// Route a joint destination field
    pub fn set_joint_destination(&mut self, joint: Joint, value: u16) {
        self.bank.set_joint_destination(joint, value);
    }

    /// Route the hand command byte
    pub fn set_hand(&mut self, byte: u8) {
        self.bank.set_hand(HandCommand::from_byte(byte));
    }

    /// Route the chute select bits; only acts when the enable gate is set
    pub fn set_chutes(&mut self, mask: u8, enabled: bool) {
        if enabled {
            self.bank.set_chutes(mask & CHUTE_SELECT_MASK);
        }
    }

    /// Route the lid bit
    pub fn set_lid(&mut self, open: bool) {
        self.bank.set_lid(open);
    }

    /// Release every actuator
    pub fn release_all(&mut self) {
        self.bank.release_all();
    }
}

/// Actuator bank that logs every operation via `tracing`
///
/// Default sink for the binary; hardware register access is out of scope
/// for this core and lives behind the same trait in the peripheral crate.
#[derive(Debug, Default)]
pub struct LoggingActuatorBank;

impl LoggingActuatorBank {
    pub fn new() -> Self {
        Self
    }
}

impl ActuatorBank for LoggingActuatorBank {
    fn set_wheel(&mut self, side: WheelSide, speed: u16, forward: bool) {
        debug!("wheel {:?}: speed {} forward {}", side, speed, forward);
    }

    fn set_joint_destination(&mut self, joint: Joint, value: u16) {
        debug!("joint {}: destination {}", joint.name(), value);
    }

    fn set_hand(&mut self, command: HandCommand) {
        let (a, b, enable) = command.drive_lines();
        debug!("hand {:?}: a={} b={} en={}", command, a, b, enable);
    }

    fn set_chutes(&mut self, mask: u8) {
        for chute in 0..WIRED_CHUTES {
            let closed = mask & (1 << chute) != 0;
            debug!("chute {}: {}", chute + 1, if closed { "close" } else { "open" });
        }
    }

    fn set_lid(&mut self, open: bool) {
        let pulse = if open { LID_OPEN_PULSE_US } else { LID_CLOSED_PULSE_US };
        debug!("lid {}: pulse {}us", if open { "open" } else { "close" }, pulse);
    }

    fn release_all(&mut self) {
        info!("releasing all actuators");
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// One recorded bank operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BankOp {
        Wheel(WheelSide, u16, bool),
        Joint(Joint, u16),
        Hand(HandCommand),
        Chutes(u8),
        Lid(bool),
        ReleaseAll,
    }

    /// Actuator bank that records operations for assertions
    #[derive(Debug, Clone, Default)]
    pub struct RecordingBank {
        ops: Arc<Mutex<Vec<BankOp>>>,
    }

    impl RecordingBank {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ops(&self) -> Vec<BankOp> {
            self.ops.lock().unwrap().clone()
        }
    }

    impl ActuatorBank for RecordingBank {
        fn set_wheel(&mut self, side: WheelSide, speed: u16, forward: bool) {
            self.ops.lock().unwrap().push(BankOp::Wheel(side, speed, forward));
        }

        fn set_joint_destination(&mut self, joint: Joint, value: u16) {
            self.ops.lock().unwrap().push(BankOp::Joint(joint, value));
        }

        fn set_hand(&mut self, command: HandCommand) {
            self.ops.lock().unwrap().push(BankOp::Hand(command));
        }

        fn set_chutes(&mut self, mask: u8) {
            self.ops.lock().unwrap().push(BankOp::Chutes(mask));
        }

        fn set_lid(&mut self, open: bool) {
            self.ops.lock().unwrap().push(BankOp::Lid(open));
        }

        fn release_all(&mut self) {
            self.ops.lock().unwrap().push(BankOp::ReleaseAll);
        }
    }
}
