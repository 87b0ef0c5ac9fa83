//! Sensor log recording
//!
//! One append-only CSV log per sensor stream, each with a fixed header.

mod csv;
mod logger;

pub use csv::{CsvSink, Field, RecordSink};
pub use logger::{
    IMU_SCHEMA, LASER_SCHEMA, ODOM_SCHEMA, SensorLogger, SensorLoggers, log_file_name,
};
