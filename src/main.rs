//! # Rover Payload Core
//!
//! Command-and-telemetry core for a remotely operated robotic arm/rover
//! payload controller.
//!
//! Decodes binary command frames from the onboard computer's serial
//! uplink, routes decoded fields to actuator outputs, decodes science and
//! joint position telemetry on independent serial links, and publishes a
//! telemetry frame on every heartbeat.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::info;

use rover_core::actuation::LoggingActuatorBank;
use rover_core::config::Config;
use rover_core::controller::Controller;
use rover_core::events::Event;
use rover_core::serial::{ByteChannel, SerialChannel};

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

fn open_channel(path: &str, baud_rate: u32) -> Result<Box<dyn ByteChannel>> {
    let channel = SerialChannel::open(path, baud_rate)?;
    info!("opened {}", channel.device_path());
    Ok(Box::new(channel))
}

/// Main entry point for the rover payload core
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (path from the first CLI argument, or the
///      default)
///    - Open the uplink, science and four joint feedback serial links
///
/// 2. **Main Loop**
///    - The heartbeat interval raises the heartbeat event
///    - The poll interval scans every link and raises byte-arrival events
///    - The dispatch loop drains pending events to completion
///    - Ctrl+C exits cleanly
///
/// Producers only set event bits; all decoding and actuation happens on
/// the dispatch context.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("rover payload core v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    info!("configuration loaded from {}", config_path);

    let uplink = open_channel(&config.uplink.port, config.uplink.baud_rate)?;
    let science = open_channel(&config.science.port, config.science.baud_rate)?;
    let joints = [
        open_channel(&config.joints.turret_port, config.joints.baud_rate)?,
        open_channel(&config.joints.shoulder_port, config.joints.baud_rate)?,
        open_channel(&config.joints.elbow_port, config.joints.baud_rate)?,
        open_channel(&config.joints.forearm_port, config.joints.baud_rate)?,
    ];

    let mut controller = Controller::new(uplink, science, joints, LoggingActuatorBank::new());
    let events = controller.events();

    let mut heartbeat = interval(Duration::from_millis(config.timing.heartbeat_interval_ms));
    let mut link_poll = interval(Duration::from_millis(config.timing.link_poll_interval_ms));

    info!(
        "dispatch loop running (heartbeat every {}ms)",
        config.timing.heartbeat_interval_ms
    );
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                events.raise(Event::Heartbeat);
            }

            _ = link_poll.tick() => {
                controller.scan_links();
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }

        controller.run_pending();
    }

    Ok(())
}
