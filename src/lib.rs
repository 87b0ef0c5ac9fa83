//! Motion profile executor
//!
//! Drives a mobile robot through one of three open-loop motion profiles
//! (circle, spiral, line) while recording its IMU, odometry and laser
//! streams into per-sensor CSV files for offline analysis.
//!
//! The control core (readiness gate, control loop, loggers and the
//! cooperative scheduler) is transport-neutral. The `ros` feature adds the
//! r2r adapter used by the `motion_executor` binary.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Readiness gate, node state and scheduler
pub mod core;
pub mod navigation;
pub mod recorder;
#[cfg(feature = "ros")]
pub mod ros_interface;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Re-export commonly used items for easier access
pub use crate::core::{
    CommandPublisher, Event, EventQueues, ImuSample, MotionNode, OdomSample, ReadinessTracker,
    ScanSample, Scheduler, SensorKind, Stamp, TickClock,
};
pub use navigation::{ControlLoop, LoopState, MotionProfile, VelocityCommand};
pub use recorder::{CsvSink, Field, RecordSink, SensorLogger, SensorLoggers};

/// Top-level configuration for the motion executor node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// ROS 2 node, topic and QoS settings
    pub ros: RosConfig,
    /// Control loop timing
    pub control: ControlConfig,
    /// Sensor log output
    pub logging: LogConfig,
}

/// ROS 2 specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Node name
    pub node_name: String,
    /// Node namespace
    pub namespace: String,
    /// Outbound velocity command topic
    pub cmd_vel_topic: String,
    /// Inertial measurement topic
    pub imu_topic: String,
    /// Odometry topic
    pub odom_topic: String,
    /// Laser scan topic
    pub scan_topic: String,
    /// History depth for every subscription and the publisher
    pub qos_depth: usize,
    /// Delivery reliability for the sensor subscriptions
    pub reliability: Reliability,
    /// Upper bound on a single `spin_once` wait, in milliseconds
    pub spin_timeout_ms: u64,
}

/// Reliability policy applied to the sensor subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    /// Drop samples rather than retransmit
    BestEffort,
    /// Retransmit until acknowledged
    Reliable,
}

/// Control loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Tick period in seconds; also the elapsed-time step per emitted command
    pub tick_period_secs: f64,
}

/// Sensor log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory the three CSV files are written into
    pub output_dir: PathBuf,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            node_name: "motion_types".to_string(),
            namespace: String::new(),
            cmd_vel_topic: "/cmd_vel".to_string(),
            imu_topic: "/imu".to_string(),
            odom_topic: "/odom".to_string(),
            scan_topic: "/scan".to_string(),
            qos_depth: 10,
            reliability: Reliability::BestEffort,
            spin_timeout_ms: 10,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            tick_period_secs: 0.1,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            output_dir: PathBuf::from("."),
        }
    }
}

impl MotionConfig {
    /// Load a configuration from a YAML file. Missing sections take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, NodeError> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if yaml.trim().is_empty() {
            return Ok(MotionConfig::default());
        }
        let config: MotionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the node cannot run with
    pub fn validate(&self) -> Result<(), NodeError> {
        let period = self.control.tick_period_secs;
        if !period.is_finite() || period <= 0.0 {
            return Err(NodeError::Config(format!(
                "tick_period_secs must be a positive number, got {}",
                period
            )));
        }
        if self.ros.qos_depth == 0 {
            return Err(NodeError::Config("qos_depth must be at least 1".to_string()));
        }
        let topics = [
            ("cmd_vel_topic", &self.ros.cmd_vel_topic),
            ("imu_topic", &self.ros.imu_topic),
            ("odom_topic", &self.ros.odom_topic),
            ("scan_topic", &self.ros.scan_topic),
        ];
        for (name, topic) in topics {
            if topic.trim().is_empty() {
                return Err(NodeError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// Parses the motion selector and opens the three sensor logs for it.
/// Nothing is created on disk when the selector is unknown.
pub fn open_session(selector: &str, config: &MotionConfig) -> Result<(MotionProfile, SensorLoggers), NodeError> {
    let profile: MotionProfile = selector.parse()?;
    config.validate()?;
    let loggers = SensorLoggers::create(&config.logging.output_dir, profile)?;
    Ok((profile, loggers))
}

/// Errors raised by the motion executor
#[derive(Debug, Error)]
pub enum NodeError {
    /// Motion selector did not name a known profile
    #[error("we don't have '{0}' motion type (expected one of: circle, spiral, line)")]
    UnknownMotion(String),
    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),
    /// Filesystem failure while setting up the node
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed YAML configuration
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Sensor message arrived without a usable header stamp
    #[error("{0} message has a missing or malformed header stamp")]
    MissingTimestamp(SensorKind),
    /// Row handed to a logger does not match its schema
    #[error("{logger} logger expects {expected} columns, got {actual}")]
    SchemaMismatch {
        /// Logger output identifier
        logger: String,
        /// Schema width
        expected: usize,
        /// Row width
        actual: usize,
    },
    /// Appending a row to a sensor log failed
    #[error("failed to append to {logger} log: {source}")]
    Log {
        /// Logger output identifier
        logger: String,
        /// Underlying write error
        source: std::io::Error,
    },
    /// Outbound command could not be published
    #[error("failed to publish velocity command: {0}")]
    Publish(String),
    /// ROS 2 middleware failure
    #[cfg(feature = "ros")]
    #[error("ROS error: {0}")]
    Ros(#[from] r2r::Error),
}
