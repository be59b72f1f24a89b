//! # Controller Module
//!
//! The explicitly owned controller context and its cooperative dispatch
//! loop.
//!
//! This module handles:
//! - Ownership of all decoder state, the six byte channels, the actuation
//!   router and the published readings
//! - Draining the event mask in fixed priority order
//! - Re-arming a channel's event when bytes remain after its handler
//! - The heartbeat: telemetry emission and feedback polling
//! - The command-link watchdog that releases the actuators when the
//!   uplink goes quiet
//!
//! Producers (the link scan and the heartbeat timer) only raise event
//! bits; every handler runs to completion on the dispatch context, so no
//! decoder state is ever touched from two contexts at once.

use crate::actuation::{ActuationRouter, ActuatorBank, Joint};
use crate::error::Result;
use crate::events::{Event, EventMask};
use crate::protocol::command::CommandDecoder;
use crate::protocol::position::{PositionDecoder, ValidationPolicy};
use crate::protocol::science::ScienceDecoder;
use crate::protocol::{JOINT_FEEDBACK_REQUEST, SCIENCE_DATA_REQUEST};
use crate::serial::ByteChannel;
use crate::telemetry::TelemetryReadings;
use std::sync::Arc;
use tracing::{debug, warn};

/// Heartbeats without an uplink command before the watchdog releases the
/// actuators
pub const COMMAND_TIMEOUT_HEARTBEATS: u32 = 6;

/// One joint feedback link: its channel plus its persistent decoder
struct JointLink {
    channel: Box<dyn ByteChannel>,
    decoder: PositionDecoder,
}

/// Controller context owning every piece of shared mutable state
///
/// Single-writer/single-reader discipline is enforced by ownership: only
/// the dispatch loop borrows the decoders and readings, producers touch
/// nothing but the atomic event mask.
pub struct Controller<B: ActuatorBank> {
    uplink: Box<dyn ByteChannel>,
    science: Box<dyn ByteChannel>,
    joints: [JointLink; 4],
    command: CommandDecoder,
    science_decoder: ScienceDecoder,
    router: ActuationRouter<B>,
    readings: TelemetryReadings,
    events: Arc<EventMask>,
    watchdog_heartbeats: u32,
    in_reset: bool,
}

fn joint_event(joint: Joint) -> Event {
    match joint {
        Joint::Turret => Event::TurretPos,
        Joint::Shoulder => Event::ShoulderPos,
        Joint::Elbow => Event::ElbowPos,
        Joint::Forearm => Event::ForearmPos,
    }
}

impl<B: ActuatorBank> Controller<B> {
    /// Build the controller around its six links and the actuator sink
    ///
    /// Joint channels are given in frame order (turret, shoulder, elbow,
    /// forearm); each gets the validation policy its channel carries in
    /// the field.
    pub fn new(
        uplink: Box<dyn ByteChannel>,
        science: Box<dyn ByteChannel>,
        joint_channels: [Box<dyn ByteChannel>; 4],
        bank: B,
    ) -> Self {
        let [turret, shoulder, elbow, forearm] = joint_channels;
        let joints = [
            JointLink {
                channel: turret,
                decoder: PositionDecoder::new(ValidationPolicy::commit_in_range()),
            },
            JointLink {
                channel: shoulder,
                decoder: PositionDecoder::new(ValidationPolicy::merge_in_range()),
            },
            JointLink {
                channel: elbow,
                decoder: PositionDecoder::new(ValidationPolicy::merge_in_range()),
            },
            JointLink {
                channel: forearm,
                decoder: PositionDecoder::new(ValidationPolicy::commit_in_range()),
            },
        ];

        Self {
            uplink,
            science,
            joints,
            command: CommandDecoder::new(),
            science_decoder: ScienceDecoder::new(),
            router: ActuationRouter::new(bank),
            readings: TelemetryReadings::default(),
            events: Arc::new(EventMask::new()),
            watchdog_heartbeats: 0,
            in_reset: false,
        }
    }

    /// Shared handle to the event mask for producers
    pub fn events(&self) -> Arc<EventMask> {
        Arc::clone(&self.events)
    }

    /// Currently published readings
    pub fn readings(&self) -> &TelemetryReadings {
        &self.readings
    }

    /// Raise the per-channel events for every link currently holding bytes
    ///
    /// This is the byte-arrival producer: it only sets bits, it never
    /// decodes.
    pub fn scan_links(&self) {
        if self.uplink.has_bytes() {
            self.events.raise(Event::CommandRx);
        }
        if self.science.has_bytes() {
            self.events.raise(Event::Science);
        }
        for (joint, link) in Joint::ALL.iter().zip(&self.joints) {
            if link.channel.has_bytes() {
                self.events.raise(joint_event(*joint));
            }
        }
    }

    /// Drain the event mask, running each pending handler to completion
    ///
    /// Handlers re-raise their own event when the channel still reports
    /// unconsumed bytes, so a frame arriving mid-handler is never lost.
    /// Handler failures are logged, never fatal.
    pub fn run_pending(&mut self) {
        while !self.events.is_idle() {
            for event in Event::DISPATCH_ORDER {
                if self.events.take(event) {
                    self.handle(event);
                }
            }
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::CommandRx => self.handle_command_rx(),
            Event::TurretPos => self.handle_position(Joint::Turret),
            Event::ShoulderPos => self.handle_position(Joint::Shoulder),
            Event::ElbowPos => self.handle_position(Joint::Elbow),
            Event::ForearmPos => self.handle_position(Joint::Forearm),
            Event::Science => self.handle_science(),
            Event::Heartbeat => self.handle_heartbeat(),
        }
    }

    fn handle_command_rx(&mut self) {
        // The uplink is alive again
        self.watchdog_heartbeats = 0;
        self.in_reset = false;

        match self.command.drain(self.uplink.as_mut(), &mut self.router) {
            Ok(true) => self.events.raise(Event::CommandRx),
            Ok(false) => {}
            Err(e) => warn!("uplink decode pass aborted: {}", e),
        }
    }

    fn handle_position(&mut self, joint: Joint) {
        let Self {
            joints, readings, ..
        } = self;
        let JointLink { channel, decoder } = &mut joints[joint.index()];

        if decoder.drain(channel.as_mut(), readings.position_mut(joint)) {
            self.events.raise(joint_event(joint));
        }
    }

    fn handle_science(&mut self) {
        if self
            .science_decoder
            .drain(self.science.as_mut(), &mut self.readings)
        {
            self.events.raise(Event::Science);
        }
    }

    fn handle_heartbeat(&mut self) {
        self.watchdog_heartbeats = self.watchdog_heartbeats.saturating_add(1);
        if self.watchdog_heartbeats >= COMMAND_TIMEOUT_HEARTBEATS && !self.in_reset {
            self.in_reset = true;
            warn!(
                "no uplink command in {} heartbeats, releasing actuators",
                self.watchdog_heartbeats
            );
            self.router.release_all();
        }

        if let Err(e) = self.emit_feedback() {
            warn!("heartbeat emission failed: {}", e);
        }
    }

    /// Publish the telemetry frame and solicit fresh feedback
    fn emit_feedback(&mut self) -> Result<()> {
        let frame = self.readings.encode_frame();
        self.uplink.write_bytes(&frame)?;

        self.science.write_bytes(&SCIENCE_DATA_REQUEST)?;
        for link in &mut self.joints {
            link.channel.write_bytes(&JOINT_FEEDBACK_REQUEST)?;
        }

        debug!("heartbeat: telemetry published, feedback requested");
        Ok(())
    }
}
