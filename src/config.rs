//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub uplink: LinkConfig,

    #[serde(default)]
    pub science: LinkConfig,

    #[serde(default)]
    pub joints: JointLinksConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

/// One serial link
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    #[serde(default = "default_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

/// The four joint feedback links; they share one line speed
#[derive(Debug, Deserialize, Clone)]
pub struct JointLinksConfig {
    #[serde(default = "default_turret_port")]
    pub turret_port: String,

    #[serde(default = "default_shoulder_port")]
    pub shoulder_port: String,

    #[serde(default = "default_elbow_port")]
    pub elbow_port: String,

    #[serde(default = "default_forearm_port")]
    pub forearm_port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

impl Default for JointLinksConfig {
    fn default() -> Self {
        Self {
            turret_port: default_turret_port(),
            shoulder_port: default_shoulder_port(),
            elbow_port: default_elbow_port(),
            forearm_port: default_forearm_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

/// Heartbeat and link-poll cadence
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    #[serde(default = "default_link_poll_interval_ms")]
    pub link_poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            link_poll_interval_ms: default_link_poll_interval_ms(),
        }
    }
}

// Default value functions
fn default_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 9600 }

fn default_turret_port() -> String { "/dev/ttyUSB1".to_string() }
fn default_shoulder_port() -> String { "/dev/ttyUSB2".to_string() }
fn default_elbow_port() -> String { "/dev/ttyUSB3".to_string() }
fn default_forearm_port() -> String { "/dev/ttyUSB4".to_string() }

fn default_heartbeat_interval_ms() -> u64 { 100 }
fn default_link_poll_interval_ms() -> u64 { 1 }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any port is empty or an interval is zero
    fn validate(&self) -> Result<()> {
        let ports = [
            ("uplink", &self.uplink.port),
            ("science", &self.science.port),
            ("joints.turret", &self.joints.turret_port),
            ("joints.shoulder", &self.joints.shoulder_port),
            ("joints.elbow", &self.joints.elbow_port),
            ("joints.forearm", &self.joints.forearm_port),
        ];
        for (name, port) in ports {
            if port.is_empty() {
                return Err(crate::error::RoverCoreError::Config(
                    toml::de::Error::custom(format!("{} port cannot be empty", name)),
                ));
            }
        }

        if self.timing.heartbeat_interval_ms == 0 {
            return Err(crate::error::RoverCoreError::Config(
                toml::de::Error::custom("heartbeat_interval_ms must be nonzero"),
            ));
        }
        if self.timing.link_poll_interval_ms == 0 {
            return Err(crate::error::RoverCoreError::Config(
                toml::de::Error::custom("link_poll_interval_ms must be nonzero"),
            ));
        }

        Ok(())
    }
}
