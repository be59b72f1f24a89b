//! # Rover Payload Core Library
//!
//! Command-and-telemetry core for a remotely operated robotic arm/rover
//! payload controller.
//!
//! This library decodes binary command frames arriving over a serial uplink,
//! routes decoded fields to actuator outputs, decodes science and
//! joint-encoder telemetry on independent serial links, and periodically
//! assembles an outbound telemetry frame.

pub mod config;
pub mod error;
pub mod protocol;
pub mod actuation;
pub mod telemetry;
pub mod events;
pub mod serial;
pub mod controller;
