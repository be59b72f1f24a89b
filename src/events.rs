//! # Event Bitmask
//!
//! Level-triggered set of pending work items shared between asynchronous
//! producers (byte-arrival scans, the heartbeat timer) and the cooperative
//! dispatch loop.
//!
//! Producers only ever set bits; the dispatch loop test-and-clears them.
//! Both sides go through atomic read-modify-write operations so a flag
//! raised while its handler is running is never lost.

use std::sync::atomic::{AtomicU32, Ordering};

/// Pending work items, one bit per event.
///
/// The bit assignments are a process-wide contract between producers and
/// the dispatcher and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Event {
    /// Bytes pending on the uplink command channel
    CommandRx = 0x0001,

    /// Periodic heartbeat is due
    Heartbeat = 0x0002,

    /// Bytes pending on the science telemetry channel
    Science = 0x0004,

    // 0x0008 is unassigned

    /// Bytes pending on the turret feedback channel
    TurretPos = 0x0010,

    /// Bytes pending on the shoulder feedback channel
    ShoulderPos = 0x0020,

    /// Bytes pending on the elbow feedback channel
    ElbowPos = 0x0040,

    /// Bytes pending on the forearm feedback channel
    ForearmPos = 0x0080,
}

impl Event {
    /// Fixed dispatch priority: uplink commands first, then position
    /// feedback, then science data, heartbeat last.
    pub const DISPATCH_ORDER: [Event; 7] = [
        Event::CommandRx,
        Event::TurretPos,
        Event::ShoulderPos,
        Event::ElbowPos,
        Event::ForearmPos,
        Event::Science,
        Event::Heartbeat,
    ];

    /// The event's bit in the shared mask
    pub fn bit(self) -> u32 {
        self as u32
    }
}

/// Atomic level-triggered event mask.
///
/// `raise` and `take` are single read-modify-write instructions, so a
/// producer setting a bit concurrently with the dispatcher clearing
/// another can never drop a flag.
#[derive(Debug, Default)]
pub struct EventMask(AtomicU32);

impl EventMask {
    /// Create an empty mask
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Mark an event as pending
    pub fn raise(&self, event: Event) {
        self.0.fetch_or(event.bit(), Ordering::AcqRel);
    }

    /// Atomically clear the event's bit, returning whether it was set
    pub fn take(&self, event: Event) -> bool {
        self.0.fetch_and(!event.bit(), Ordering::AcqRel) & event.bit() != 0
    }

    /// True when no events are pending
    pub fn is_idle(&self) -> bool {
        self.0.load(Ordering::Acquire) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bit_assignments() {
        // Wire-level enumeration shared with the producers
        assert_eq!(Event::CommandRx.bit(), 0x0001);
        assert_eq!(Event::Heartbeat.bit(), 0x0002);
        assert_eq!(Event::Science.bit(), 0x0004);
        assert_eq!(Event::TurretPos.bit(), 0x0010);
        assert_eq!(Event::ShoulderPos.bit(), 0x0020);
        assert_eq!(Event::ElbowPos.bit(), 0x0040);
        assert_eq!(Event::ForearmPos.bit(), 0x0080);
    }

    #[test]
    fn test_raise_and_take() {
        let mask = EventMask::new();
        assert!(mask.is_idle());

        mask.raise(Event::CommandRx);
        assert!(!mask.is_idle());

        assert!(mask.take(Event::CommandRx));
        assert!(mask.is_idle());

        // Second take observes the cleared bit
        assert!(!mask.take(Event::CommandRx));
    }

    #[test]
    fn test_take_clears_only_the_taken_bit() {
        let mask = EventMask::new();
        mask.raise(Event::CommandRx);
        mask.raise(Event::Heartbeat);

        assert!(mask.take(Event::CommandRx));
        assert!(!mask.is_idle());
        assert!(mask.take(Event::Heartbeat));
        assert!(mask.is_idle());
    }

    #[test]
    fn test_flag_raised_during_handling_stays_pending() {
        let mask = EventMask::new();
        mask.raise(Event::Science);

        // Dispatcher takes the flag and starts handling
        assert!(mask.take(Event::Science));

        // Producer raises the same flag while the handler runs
        mask.raise(Event::Science);

        // The next dispatch pass still sees it
        assert!(!mask.is_idle());
        assert!(mask.take(Event::Science));
    }

    #[test]
    fn test_dispatch_order_covers_all_events() {
        let mut combined = 0u32;
        for event in Event::DISPATCH_ORDER {
            combined |= event.bit();
        }
        assert_eq!(combined, 0x00F7);
        assert_eq!(Event::DISPATCH_ORDER[0], Event::CommandRx);
        assert_eq!(Event::DISPATCH_ORDER[6], Event::Heartbeat);
    }
}
